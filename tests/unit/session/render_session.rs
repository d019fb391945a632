use super::*;
use crate::foundation::core::Span;

fn sliding_rect(repeat: Option<&str>) -> SceneNode {
    let mut anim = SceneNode::new("animate")
        .with_attr("attributeName", "x")
        .with_attr("from", "0")
        .with_attr("to", "100")
        .with_attr("begin", "0s")
        .with_attr("dur", "1s")
        .with_attr("fill", "freeze");
    if let Some(r) = repeat {
        anim = anim.with_attr("repeatCount", r);
    }
    SceneNode::new("svg").with_child(
        SceneNode::new("rect")
            .with_id("r")
            .with_attr("x", "0")
            .with_child(anim),
    )
}

fn session(repeat: Option<&str>) -> RenderSession {
    RenderSession::new(sliding_rect(repeat), Fps::new(10, 1).unwrap()).unwrap()
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

fn x_at(frame: &SceneNode) -> &str {
    frame.find("r").unwrap().attr("x").unwrap()
}

#[test]
fn frames_map_to_presentation_times() {
    let s = session(None);
    assert_eq!(s.duration_secs(), 1.0);
    assert_eq!(s.frame_count(), 10);
    assert_eq!(s.full_range(), range(0, 10));
    assert_eq!(x_at(&s.render_frame(FrameIndex(5)).unwrap()), "50.000");
    assert_eq!(x_at(&s.render_frame(FrameIndex(40)).unwrap()), "100.000");
}

#[test]
fn parallel_output_matches_sequential() {
    let s = session(None).with_duration(2.0);
    let seq = s.render_range(s.full_range(), &RenderThreading::default()).unwrap();
    let par = s
        .render_range(
            s.full_range(),
            &RenderThreading {
                parallel: true,
                threads: Some(2),
                ..RenderThreading::default()
            },
        )
        .unwrap();
    assert_eq!(seq.len(), 20);
    assert_eq!(seq, par);
    assert_eq!(x_at(&seq[3]), "30.000");
}

#[test]
fn settled_frames_are_elided() {
    let s = session(None);
    let threading = RenderThreading {
        static_frame_elision: true,
        ..RenderThreading::default()
    };
    let (frames, stats) = s.render_range_with_stats(range(0, 20), &threading).unwrap();
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 20,
            frames_rendered: 12,
            frames_elided: 8,
        }
    );
    let plain = s.render_range(range(0, 20), &RenderThreading::default()).unwrap();
    assert_eq!(frames, plain);
}

#[test]
fn indefinite_repeats_disable_elision() {
    let s = session(Some("indefinite"));
    let threading = RenderThreading {
        static_frame_elision: true,
        ..RenderThreading::default()
    };
    let (frames, stats) = s.render_range_with_stats(range(0, 20), &threading).unwrap();
    assert_eq!(stats.frames_elided, 0);
    assert_eq!(x_at(&frames[15]), "50.000");
}

#[test]
fn bad_ranges_and_pools_are_rejected() {
    let s = session(None);
    let empty = s.render_range(range(3, 3), &RenderThreading::default());
    assert!(matches!(empty, Err(LiltError::Validation(_))));

    let zero = s.render_range(
        range(0, 2),
        &RenderThreading {
            parallel: true,
            threads: Some(0),
            ..RenderThreading::default()
        },
    );
    assert!(matches!(zero, Err(LiltError::Validation(_))));
}

#[test]
fn page_sessions_run_until_fade_out() {
    let config = RenderConfig {
        fps: 10,
        fade_out: 0.5,
        ..RenderConfig::default()
    };
    let page = PageScene {
        root: sliding_rect(None),
        span: Some(Span {
            begin: 0.0,
            end: 1.0,
        }),
        warnings: Vec::new(),
    };
    let s = RenderSession::from_page(page, &config).unwrap();
    assert_eq!(s.fps(), Fps::new(10, 1).unwrap());
    assert_eq!(s.frame_count(), 15);
    assert!(s.warnings().is_empty());
}
