use super::*;
use crate::document::model::DocumentNode;
use crate::eval::snapshot::SnapshotEngine;
use crate::layout::text::{FixedAdvanceMetrics, layout_document};
use crate::timeline::cues::{Cue, propagate};

struct Fixture {
    doc: Document,
    timeline: Timeline,
    layout: Layout,
    config: RenderConfig,
}

fn fixture(config: RenderConfig) -> Fixture {
    let doc = Document::from_tree(
        DocumentNode::new(NodeKind::Root).with_child(
            DocumentNode::new(NodeKind::Page).with_id("p1").with_child(
                DocumentNode::new(NodeKind::Sentence)
                    .with_id("s1")
                    .with_child(DocumentNode::word("w1", "hello"))
                    .with_child(DocumentNode::text_run(" "))
                    .with_child(DocumentNode::word("w2", "world"))
                    .with_child(DocumentNode::text_run(" "))
                    .with_child(DocumentNode::word("w3", "again").not_highlightable()),
            ),
        ),
    )
    .unwrap();
    let timeline = propagate(
        &doc,
        &[
            Cue::new("w1", 2.0, 3.0).unwrap(),
            Cue::new("w2", 3.0, 4.0).unwrap(),
        ],
    );
    let layout = layout_document(&doc, &config, &FixedAdvanceMetrics::default());
    Fixture {
        doc,
        timeline,
        layout,
        config,
    }
}

fn config() -> RenderConfig {
    RenderConfig {
        width: 800.0,
        height: 200.0,
        font_size: 20.0,
        lead_in: 1.0,
        fade_out: 0.5,
        ..RenderConfig::default()
    }
}

fn compose(f: &Fixture) -> PageScene {
    build_page_scene(&f.doc, &f.timeline, &f.layout, f.doc.find("p1").unwrap(), &f.config)
}

fn x_of(f: &Fixture, id: &str) -> f64 {
    f.layout.rect(f.doc.find(id).unwrap()).unwrap().x0
}

#[test]
fn page_has_groups_and_text_tokens() {
    let f = fixture(config());
    let page = compose(&f);
    assert_eq!(page.root.tag, "svg");
    assert_eq!(page.root.attr("width"), Some("800"));
    assert_eq!(page.span, Some(Span { begin: 2.0, end: 4.0 }));

    let sentence = page.root.find("s1").unwrap();
    assert_eq!(sentence.tag, "g");
    assert_eq!(sentence.children.len(), 5);

    let w1 = page.root.find("w1").unwrap();
    assert_eq!(w1.tag, "text");
    assert_eq!(w1.text.as_deref(), Some("hello"));
    assert_eq!(w1.attr("fill"), Some("#000000"));
    assert_eq!(w1.attr("font-family"), Some("NotoSans"));
    assert_eq!(w1.bounds.unwrap().x, x_of(&f, "w1"));
}

#[test]
fn only_cued_highlightable_words_carry_declarations() {
    let f = fixture(config());
    let page = compose(&f);
    let w1 = page.root.find("w1").unwrap();
    // set x, animate x, two colour ramps, two highlight sets, two fades.
    assert_eq!(w1.children.len(), 8);
    assert!(w1.children.iter().all(SceneNode::is_declaration));
    assert!(page.root.find("w3").unwrap().children.is_empty());
}

#[test]
fn words_fly_in_highlight_and_fade_back() {
    let f = fixture(config());
    let engine = SnapshotEngine::new(compose(&f).root).unwrap();
    assert!(engine.warnings().is_empty());
    let attr = |t: f64, id: &str, name: &str| {
        let snap = engine.snapshot(t).unwrap();
        snap.find(id).unwrap().attr(name).unwrap().to_string()
    };

    let x = x_of(&f, "w1");
    assert_eq!(attr(0.5, "w1", "x"), fmt3(x + 800.0));
    assert_eq!(attr(0.5, "w1", "fill"), "#000000");
    assert_eq!(attr(1.5, "w1", "x"), fmt3(x + 400.0));
    assert_eq!(attr(1.5, "w1", "fill"), "rgb(127.500, 0.000, 0.000)");
    assert_eq!(attr(2.5, "w1", "fill"), "#ff0000");
    assert_eq!(attr(2.5, "w1", "x"), fmt3(x));
    assert_eq!(attr(2.5, "w2", "fill"), "rgb(127.500, 0.000, 0.000)");
    assert_eq!(attr(3.25, "w1", "fill"), "rgb(127.500, 0.000, 0.000)");
    assert_eq!(attr(10.0, "w1", "fill"), "rgb(0.000, 0.000, 0.000)");
    assert_eq!(attr(10.0, "w1", "stroke"), "rgb(0.000, 0.000, 0.000)");
    // The untimed word never moves.
    assert_eq!(attr(0.5, "w3", "x"), fmt3(x_of(&f, "w3")));
}

#[test]
fn lead_in_is_clipped_at_zero() {
    let mut f = fixture(config());
    f.timeline = propagate(&f.doc, &[Cue::new("w1", 0.5, 1.0).unwrap()]);
    let page = compose(&f);
    let w1 = page.root.find("w1").unwrap();
    assert!(!w1.children.iter().any(|d| d.tag == "set" && d.attr("attributeName") == Some("x")));
    let fly = w1
        .children
        .iter()
        .find(|d| d.tag == "animate" && d.attr("attributeName") == Some("x"))
        .unwrap();
    assert_eq!(fly.attr("begin"), Some("0.000s"));
    assert_eq!(fly.attr("dur"), Some("0.500s"));
}

#[test]
fn background_and_indicator_follow_config() {
    let mut cfg = config();
    cfg.bg_color = Some("#202020".to_string());
    cfg.bg_color_opacity = Some(0.5);
    let page = compose(&fixture(cfg.clone()));
    let bg = &page.root.children[0];
    assert_eq!(bg.tag, "rect");
    assert_eq!(bg.attr("fill"), Some("#202020"));
    assert_eq!(bg.attr("fill-opacity"), Some("0.500"));
    assert!(page.root.find(INDICATOR_ID).is_some());
    assert!(page.warnings.is_empty());

    cfg.indicator.enabled = false;
    let page = compose(&fixture(cfg));
    assert!(page.root.find(INDICATOR_ID).is_none());
}

#[test]
fn every_page_is_composed() {
    let f = fixture(config());
    let pages = build_document_scenes(&f.doc, &f.timeline, &f.layout, &f.config, None);
    assert_eq!(pages.len(), 1);
    assert!(pages[0].root.find("w2").is_some());
}
