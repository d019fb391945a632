use crate::config::RenderConfig;
use crate::document::model::{Document, NodeKind};
use crate::foundation::core::{NodeIdx, Span};
use crate::foundation::error::Warning;
use crate::foundation::math::fmt3;
use crate::indicator::waypoint::{collect_waypoints, compile_waypoints, narrow_waypoints};
use crate::layout::text::{Layout, tokens_of};
use crate::scene::node::{Bounds, SceneNode};
use crate::timeline::amplitude::AmplitudeSource;
use crate::timeline::cues::{INSTANT_CUE_SECS, Timeline};

/// Id given to the indicator group of every page.
pub const INDICATOR_ID: &str = "lilt-indicator";

#[derive(Clone, Debug)]
/// One page composed into an animated scene.
pub struct PageScene {
    /// `svg` root carrying the page's animation declarations.
    pub root: SceneNode,
    /// Time window covered by the page's cues, if any.
    pub span: Option<Span>,
    /// Recovered problems found while composing (indicator overlaps).
    pub warnings: Vec<Warning>,
}

/// Compose `page` into an animated scene without amplitude narrowing.
pub fn build_page_scene(
    doc: &Document,
    timeline: &Timeline,
    layout: &Layout,
    page: NodeIdx,
    config: &RenderConfig,
) -> PageScene {
    build_page_scene_with(doc, timeline, layout, page, config, None)
}

/// Compose `page` into an animated scene.
///
/// Emits an optional background, one group per sentence and one `text` node per laid-out
/// token. Every cued word flies in from the right during the lead-in while ramping to the
/// highlight colour, holds the highlight while spoken and fades back afterwards. The
/// indicator group is appended last so it draws on top.
#[tracing::instrument(skip_all, fields(page = page.0))]
pub fn build_page_scene_with(
    doc: &Document,
    timeline: &Timeline,
    layout: &Layout,
    page: NodeIdx,
    config: &RenderConfig,
    amplitude: Option<&dyn AmplitudeSource>,
) -> PageScene {
    let mut root = SceneNode::new("svg")
        .with_attr("width", config.width.to_string())
        .with_attr("height", config.height.to_string())
        .with_attr("viewBox", format!("0 0 {} {}", config.width, config.height));

    if let Some(color) = &config.bg_color {
        let mut bg = SceneNode::new("rect")
            .with_attr("x", "0")
            .with_attr("y", "0")
            .with_attr("width", config.width.to_string())
            .with_attr("height", config.height.to_string())
            .with_attr("fill", color.as_str());
        if let Some(opacity) = config.bg_color_opacity {
            bg = bg.with_attr("fill-opacity", fmt3(opacity));
        }
        root.children.push(bg);
    }

    let mut sentences = doc.descendants_of_kind(page, NodeKind::Sentence);
    if sentences.is_empty() {
        sentences.push(page);
    }
    for sentence in sentences {
        let mut group = SceneNode::new("g");
        if let Some(id) = &doc.node(sentence).id {
            group = group.with_id(id.as_str());
        }
        for token in tokens_of(doc, sentence) {
            if let Some(text) = token_node(doc, timeline, layout, token, config) {
                group.children.push(text);
            }
        }
        root.children.push(group);
    }

    let mut warnings = Vec::new();
    if config.indicator.enabled {
        let mut waypoints = collect_waypoints(doc, timeline, layout, page, &config.indicator);
        if let Some(source) = amplitude {
            narrow_waypoints(&mut waypoints, source, &config.indicator);
        }
        let plan = compile_waypoints(waypoints, &config.indicator);
        warnings.extend(plan.warnings().iter().cloned());
        if !plan.is_empty() {
            root.children.push(plan.to_scene_node(INDICATOR_ID, &config.indicator));
        }
    }

    tracing::debug!(nodes = root.count(), "page composed");
    PageScene {
        root,
        span: timeline.span(page),
        warnings,
    }
}

/// Compose every page of `doc`, in order.
pub fn build_document_scenes(
    doc: &Document,
    timeline: &Timeline,
    layout: &Layout,
    config: &RenderConfig,
    amplitude: Option<&dyn AmplitudeSource>,
) -> Vec<PageScene> {
    doc.pages()
        .into_iter()
        .map(|page| build_page_scene_with(doc, timeline, layout, page, config, amplitude))
        .collect()
}

fn token_node(
    doc: &Document,
    timeline: &Timeline,
    layout: &Layout,
    idx: NodeIdx,
    config: &RenderConfig,
) -> Option<SceneNode> {
    let rect = layout.rect(idx)?;
    let entry = doc.node(idx);
    let mut node = SceneNode::new("text")
        .with_attr("x", fmt3(rect.x0))
        .with_attr("y", fmt3(layout.baseline(rect)))
        .with_attr("font-family", config.font.as_str())
        .with_attr("font-size", fmt3(config.font_size))
        .with_attr("fill", config.text_color.as_str())
        .with_attr("stroke", config.text_color.as_str())
        .with_attr("xml:space", "preserve")
        .with_text(entry.text.clone().unwrap_or_default())
        .with_bounds(Bounds {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
        });
    if entry.kind != NodeKind::Word {
        return Some(node);
    }
    if let Some(id) = &entry.id {
        node = node.with_id(id.as_str());
    }
    if doc.is_timed(idx)
        && let Some(span) = timeline.span(idx)
    {
        node.children.extend(highlight_declarations(rect.x0, span, config));
    }
    Some(node)
}

fn highlight_declarations(x: f64, span: Span, config: &RenderConfig) -> Vec<SceneNode> {
    let lead_start = (span.begin - config.lead_in).max(0.0);
    let lead = span.begin - lead_start;
    let here = fmt3(x);
    let away = fmt3(x + config.width);
    let (text, highlight) = (config.text_color.as_str(), config.highlight_color.as_str());
    let mut out = Vec::new();

    if lead_start > 0.0 {
        out.push(
            SceneNode::new("set")
                .with_attr("attributeName", "x")
                .with_attr("to", away.as_str())
                .with_attr("begin", "0s")
                .with_attr("dur", clock(lead_start)),
        );
    }
    if lead > 0.0 {
        out.push(ramp("x", &away, &here, lead_start, lead));
        for attr in ["fill", "stroke"] {
            out.push(ramp(attr, text, highlight, lead_start, lead));
        }
    }
    for attr in ["fill", "stroke"] {
        out.push(
            SceneNode::new("set")
                .with_attr("attributeName", attr)
                .with_attr("to", highlight)
                .with_attr("begin", clock(span.begin))
                .with_attr("dur", clock(span.duration().max(INSTANT_CUE_SECS)))
                .with_attr("fill", "freeze"),
        );
    }
    let fade = config.fade_out.max(INSTANT_CUE_SECS);
    for attr in ["fill", "stroke"] {
        out.push(ramp(attr, highlight, text, span.end, fade));
    }
    out
}

fn ramp(attribute: &str, from: &str, to: &str, begin: f64, dur: f64) -> SceneNode {
    SceneNode::new("animate")
        .with_attr("attributeName", attribute)
        .with_attr("from", from)
        .with_attr("to", to)
        .with_attr("begin", clock(begin))
        .with_attr("dur", clock(dur))
        .with_attr("fill", "freeze")
}

fn clock(secs: f64) -> String {
    format!("{}s", fmt3(secs))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/scene_builder.rs"]
mod tests;
