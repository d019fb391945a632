use super::*;

fn word_with(decls: Vec<SceneNode>) -> SceneNode {
    let mut word = SceneNode::new("text").with_id("w1").with_attr("fill", "black");
    word.children = decls;
    SceneNode::new("svg").with_child(word)
}

fn fill_animation(fill: &str) -> SceneNode {
    SceneNode::new("animate")
        .with_attr("attributeName", "fill")
        .with_attr("from", "black")
        .with_attr("to", "red")
        .with_attr("begin", "1.0")
        .with_attr("dur", "2.0")
        .with_attr("fill", fill)
}

fn fill_of(scene: &SceneNode) -> String {
    scene
        .find("w1")
        .and_then(|n| n.attr("fill"))
        .unwrap_or_default()
        .to_string()
}

#[test]
fn reverts_after_window_without_freeze() {
    let engine = SnapshotEngine::new(word_with(vec![fill_animation("remove")])).unwrap();
    assert_eq!(fill_of(&engine.snapshot(0.0).unwrap()), "black");
    assert_eq!(
        fill_of(&engine.snapshot(2.0).unwrap()),
        "rgb(127.500, 0.000, 0.000)"
    );
    assert_eq!(fill_of(&engine.snapshot(5.0).unwrap()), "black");
}

#[test]
fn frozen_value_is_stable() {
    let engine = SnapshotEngine::new(word_with(vec![fill_animation("freeze")])).unwrap();
    let a = engine.snapshot(100.0).unwrap();
    let b = engine.snapshot(1000.0).unwrap();
    assert_eq!(fill_of(&a), "rgb(255.000, 0.000, 0.000)");
    assert_eq!(a, b);
}

#[test]
fn snapshots_contain_no_declarations() {
    let engine = SnapshotEngine::new(word_with(vec![fill_animation("freeze")])).unwrap();
    let snap = engine.snapshot(1.5).unwrap();
    assert_eq!(snap.count(), 2);
    assert!(snap.find("w1").is_some_and(|n| n.children.is_empty()));
}

#[test]
fn transforms_accumulate_translate_before_rotate() {
    let rotate = SceneNode::new("animateTransform")
        .with_attr("type", "rotate")
        .with_attr("from", "0")
        .with_attr("to", "90")
        .with_attr("dur", "2");
    let translate = SceneNode::new("animateTransform")
        .with_attr("type", "translate")
        .with_attr("from", "0 0")
        .with_attr("to", "10 20")
        .with_attr("dur", "2");
    let mut scene = word_with(vec![rotate, translate]);
    scene.children[0]
        .attributes
        .insert("transform".to_string(), "scale(2)".to_string());

    let engine = SnapshotEngine::new(scene).unwrap();
    let snap = engine.snapshot(1.0).unwrap();
    assert_eq!(
        snap.find("w1").and_then(|n| n.attr("transform")),
        Some("scale(2) translate(5.000 10.000) rotate(45.000)")
    );
    // Idle again after the window: authored value only.
    let idle = engine.snapshot(9.0).unwrap();
    assert_eq!(idle.find("w1").and_then(|n| n.attr("transform")), Some("scale(2)"));
}

#[test]
fn later_begin_wins_for_same_attribute() {
    let early = SceneNode::new("set")
        .with_attr("attributeName", "opacity")
        .with_attr("to", "0.2")
        .with_attr("begin", "0")
        .with_attr("dur", "10");
    let late = SceneNode::new("set")
        .with_attr("attributeName", "opacity")
        .with_attr("to", "0.9")
        .with_attr("begin", "1")
        .with_attr("dur", "10");
    // Declared late-first; evaluation order follows begin, not declaration order.
    let engine = SnapshotEngine::new(word_with(vec![late, early])).unwrap();
    let snap = engine.snapshot(2.0).unwrap();
    assert_eq!(snap.find("w1").and_then(|n| n.attr("opacity")), Some("0.9"));
}

#[test]
fn synthetic_ids_are_deterministic_and_unique() {
    let build = || {
        SceneNode::new("svg")
            .with_child(SceneNode::new("rect").with_id("lilt-anim-0"))
            .with_child(
                SceneNode::new("rect").with_child(
                    SceneNode::new("set")
                        .with_attr("attributeName", "x")
                        .with_attr("to", "5")
                        .with_attr("dur", "1"),
                ),
            )
    };
    let a = SnapshotEngine::new(build()).unwrap().snapshot(0.5).unwrap();
    let b = SnapshotEngine::new(build()).unwrap().snapshot(0.5).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.children[1].id.as_deref(), Some("lilt-anim-1"));
    assert_eq!(a.children[1].attr("x"), Some("5"));
}

#[test]
fn missing_target_warns_and_is_noop() {
    let decl = SceneNode::new("set")
        .with_attr("href", "#ghost")
        .with_attr("attributeName", "x")
        .with_attr("to", "5")
        .with_attr("dur", "1");
    let engine = SnapshotEngine::new(word_with(vec![decl])).unwrap();
    assert_eq!(engine.primitive_count(), 0);
    assert_eq!(engine.warnings().len(), 1);
    assert_eq!(engine.warnings()[0].kind, WarningKind::MissingTarget);
    assert!(engine.snapshot(0.5).is_ok());
}

#[test]
fn ambiguous_target_is_fatal() {
    let scene = SceneNode::new("svg")
        .with_child(SceneNode::new("rect").with_id("dup"))
        .with_child(SceneNode::new("rect").with_id("dup"))
        .with_child(
            SceneNode::new("set")
                .with_attr("href", "dup")
                .with_attr("attributeName", "x")
                .with_attr("to", "1")
                .with_attr("dur", "1"),
        );
    let err = SnapshotEngine::new(scene).unwrap_err();
    assert!(matches!(err, LiltError::AmbiguousTarget { count: 2, .. }));
}

#[test]
fn href_retargets_without_synthesizing_parent_id() {
    let scene = SceneNode::new("svg")
        .with_child(SceneNode::new("rect").with_id("r"))
        .with_child(
            SceneNode::new("g").with_child(
                SceneNode::new("set")
                    .with_attr("href", "#r")
                    .with_attr("attributeName", "width")
                    .with_attr("to", "3")
                    .with_attr("dur", "1"),
            ),
        );
    let snap = SnapshotEngine::new(scene).unwrap().snapshot(0.0).unwrap();
    assert_eq!(snap.find("r").and_then(|n| n.attr("width")), Some("3"));
    assert_eq!(snap.children[1].id, None);
}

#[test]
fn incompatible_values_surface_only_while_active() {
    let decl = SceneNode::new("animate")
        .with_attr("attributeName", "x")
        .with_attr("from", "1 2")
        .with_attr("to", "3")
        .with_attr("begin", "1")
        .with_attr("dur", "1");
    let engine = SnapshotEngine::new(word_with(vec![decl])).unwrap();
    assert!(engine.snapshot(0.0).is_ok());
    assert!(matches!(
        engine.snapshot(1.5),
        Err(LiltError::IncompatibleValues { .. })
    ));
}

#[test]
fn motion_moves_and_orients_target() {
    let decl = SceneNode::new("animateMotion")
        .with_attr("path", "M 0 0 L 100 0")
        .with_attr("dur", "1")
        .with_attr("rotate", "auto");
    let engine = SnapshotEngine::new(word_with(vec![decl])).unwrap();
    assert_eq!(engine.path_cache().len(), 1);
    let snap = engine.snapshot(0.25).unwrap();
    assert_eq!(
        snap.find("w1").and_then(|n| n.attr("transform")),
        Some("translate(25.000 0.000) rotate(0.000)")
    );
    assert_eq!(engine.last_change_secs(), 1.0);
}
