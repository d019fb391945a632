use super::*;

#[test]
fn span_rejects_reversed_bounds() {
    assert!(Span::new(2.0, 1.0).is_err());
    assert!(Span::new(f64::NAN, 1.0).is_err());
    let s = Span::new(1.0, 1.0).unwrap();
    assert_eq!(s.duration(), 0.0);
}

#[test]
fn span_union_and_contains() {
    let a = Span::new(0.0, 1.0).unwrap();
    let b = Span::new(3.0, 4.0).unwrap();
    assert_eq!(a.union(b), Span::new(0.0, 4.0).unwrap());
    assert!(a.contains(0.0));
    assert!(!a.contains(1.0));
}

#[test]
fn fps_frame_times_are_exact_for_integer_rates() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.frame_time_secs(FrameIndex(0)), 0.0);
    assert_eq!(fps.frame_time_secs(FrameIndex(48)), 2.0);
    assert_eq!(fps.frames_for_secs(2.0), 48);
    assert_eq!(fps.frames_for_secs(2.01), 49);
    assert_eq!(fps.frames_for_secs(0.0), 0);
}

#[test]
fn fps_frames_in_span_covers_window() {
    let fps = Fps::new(10, 1).unwrap();
    let r = fps.frames_in_span(Span::new(0.25, 1.0).unwrap());
    assert_eq!(r.start, FrameIndex(3));
    assert_eq!(r.end, FrameIndex(10));
    assert_eq!(r.iter().count(), 7);
}

#[test]
fn frame_range_rejects_reversed() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    let r = FrameRange::new(FrameIndex(2), FrameIndex(2)).unwrap();
    assert!(r.is_empty());
    assert_eq!(r.len_frames(), 0);
}

#[test]
fn fps_rejects_zero_terms() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}
