use super::*;
use crate::document::model::{DocumentNode, NodeKind};

fn three_words() -> Document {
    Document::from_tree(
        DocumentNode::new(NodeKind::Root).with_child(
            DocumentNode::new(NodeKind::Sentence)
                .with_id("s")
                .with_child(DocumentNode::word("a", "one"))
                .with_child(DocumentNode::text_run(" "))
                .with_child(DocumentNode::word("b", "two"))
                .with_child(DocumentNode::text_run(" "))
                .with_child(DocumentNode::word("c", "three")),
        ),
    )
    .unwrap()
}

fn span(begin: f64, end: f64) -> Option<Span> {
    Some(Span { begin, end })
}

#[test]
fn middle_leaf_fills_gap_between_neighbours() {
    let doc = three_words();
    let cues = vec![
        Cue::new("a", 0.0, 1.0).unwrap(),
        Cue::new("c", 3.0, 4.0).unwrap(),
    ];
    let tl = propagate(&doc, &cues);
    assert_eq!(tl.span_of(&doc, "b"), span(1.0, 3.0));
    assert_eq!(tl.span_of(&doc, "s"), span(0.0, 4.0));
    assert_eq!(tl.total(&doc), span(0.0, 4.0));
    assert!(tl.warnings().is_empty());
}

#[test]
fn text_runs_stay_untimed() {
    let doc = three_words();
    let tl = propagate(&doc, &[Cue::new("a", 0.0, 1.0).unwrap()]);
    let s = doc.find("s").unwrap();
    assert_eq!(tl.span(doc.children(s)[1]), None);
}

#[test]
fn trailing_leaves_chain_instant_cues() {
    let doc = three_words();
    let tl = propagate(&doc, &[Cue::new("a", 0.0, 1.0).unwrap()]);
    let b = tl.span_of(&doc, "b").unwrap();
    let c = tl.span_of(&doc, "c").unwrap();
    assert_eq!(b.begin, 1.0);
    assert!((b.end - (1.0 + INSTANT_CUE_SECS)).abs() < 1e-12);
    assert_eq!(c.begin, b.end);
    assert!(tl.span_of(&doc, "s").unwrap().end >= c.end);
}

#[test]
fn first_leaf_starts_at_parent_begin() {
    let doc = Document::from_tree(
        DocumentNode::new(NodeKind::Root).with_child(
            DocumentNode::new(NodeKind::Sentence)
                .with_id("s")
                .with_child(DocumentNode::word("a", "x"))
                .with_child(
                    DocumentNode::word("b", "y").with_child(DocumentNode::word("b1", "y1")),
                ),
        ),
    )
    .unwrap();
    // "b" is a container whose only leaf is cued; "a" takes the sentence's begin.
    let tl = propagate(&doc, &[Cue::new("b1", 2.0, 3.0).unwrap()]);
    assert_eq!(tl.span_of(&doc, "a"), span(2.0, 2.0));
    assert_eq!(tl.span_of(&doc, "s"), span(2.0, 3.0));
}

#[test]
fn unknown_cues_warn_and_untimed_cues_are_ignored() {
    let doc = Document::from_tree(
        DocumentNode::new(NodeKind::Root)
            .with_child(DocumentNode::word("a", "x"))
            .with_child(DocumentNode::word("h", "y").not_highlightable()),
    )
    .unwrap();
    let cues = vec![
        Cue::new("a", 1.0, 2.0).unwrap(),
        Cue::new("ghost", 0.0, 1.0).unwrap(),
        Cue::new("h", 5.0, 9.0).unwrap(),
    ];
    let tl = propagate(&doc, &cues);
    assert_eq!(tl.warnings().len(), 1);
    assert_eq!(tl.warnings()[0].kind, WarningKind::UnresolvedCue);
    assert_eq!(tl.span_of(&doc, "h"), None);
    assert_eq!(tl.total(&doc), span(1.0, 2.0));
}

#[test]
fn every_resolved_span_is_ordered() {
    let doc = three_words();
    let tl = propagate(&doc, &[Cue::new("b", 2.0, 2.5).unwrap()]);
    for idx in doc.indices() {
        if let Some(s) = tl.span(idx) {
            assert!(s.end >= s.begin, "{idx:?} {s:?}");
        }
    }
}

#[test]
fn padding_tiles_parent_window_at_midpoints() {
    let doc = three_words();
    let cues = vec![
        Cue::new("a", 1.0, 2.0).unwrap(),
        Cue::new("b", 3.0, 4.0).unwrap(),
        Cue::new("c", 4.0, 5.0).unwrap(),
    ];
    let mut tl = propagate(&doc, &cues);
    let s = doc.find("s").unwrap();
    tl.pad_children(&doc, s, 10.0);
    assert_eq!(tl.span_of(&doc, "a"), span(0.0, 2.5));
    assert_eq!(tl.span_of(&doc, "b"), span(2.5, 4.0));
    assert_eq!(tl.span_of(&doc, "c"), span(4.0, 10.0));
    assert_eq!(tl.span(s), span(0.0, 10.0));
}

#[test]
fn reversed_cue_is_rejected() {
    assert!(matches!(
        Cue::new("a", 2.0, 1.0),
        Err(LiltError::Validation(_))
    ));
}
