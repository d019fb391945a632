use super::*;

#[test]
fn partial_json_keeps_defaults() {
    let cfg = RenderConfig::from_json_str(
        r##"{
            "width": 1280,
            "font-size": 48,
            "highlight-color": "#00ff00",
            "indicator": { "enabled": false, "min-arc": 0.5 }
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.width, 1280.0);
    assert_eq!(cfg.height, 1080.0);
    assert_eq!(cfg.font_size, 48.0);
    assert_eq!(cfg.highlight_color, "#00ff00");
    assert!(!cfg.indicator.enabled);
    assert_eq!(cfg.indicator.min_arc, 0.5);
    assert_eq!(cfg.indicator.bounce_end, 0.8);
    assert_eq!(cfg.lead_in, 1.2);
    cfg.validate().unwrap();
}

#[test]
fn malformed_json_is_serde_error() {
    let err = RenderConfig::from_json_str(r#"{"width": "wide"}"#).unwrap_err();
    assert!(matches!(err, LiltError::Serde(_)));
}

#[test]
fn validation_rejects_bad_values() {
    let mut cfg = RenderConfig::default();
    cfg.validate().unwrap();

    cfg.font_size = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.margin_left = 1000.0;
    cfg.margin_right = 1000.0;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.indicator.bounce_begin = 0.9;
    cfg.indicator.bounce_end = 0.2;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.fps = 0;
    assert!(matches!(cfg.validate(), Err(LiltError::Validation(_))));
}

#[test]
fn derived_values() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.content_width(), 1720.0);
    assert_eq!(cfg.frame_rate().unwrap().as_f64(), 24.0);
}
