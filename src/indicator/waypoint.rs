use crate::animation::path::MotionPath;
use crate::config::IndicatorConfig;
use crate::document::model::{Document, NodeKind};
use crate::foundation::core::{BezPath, NodeIdx, Point, Span};
use crate::foundation::error::{Warning, WarningKind};
use crate::foundation::math::fmt3;
use crate::layout::text::Layout;
use crate::scene::node::SceneNode;
use crate::timeline::amplitude::{AmplitudeSource, narrow_span};
use crate::timeline::cues::Timeline;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A position the indicator rests on while a word is spoken.
pub struct Waypoint {
    /// Id of the word.
    pub node_id: String,
    /// Resting point (above the word).
    pub position: Point,
    /// When the indicator rests there.
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// The indicator resting on one waypoint.
pub struct Hold {
    /// Resting point.
    pub position: Point,
    /// Active window.
    pub span: Span,
    /// Rotation when the hold starts (exit angle of the arc before it).
    pub angle_begin: f64,
    /// Rotation when the hold ends (entry angle of the arc after it).
    pub angle_end: f64,
    /// Mirror horizontally; alternates from hold to hold.
    pub invert: bool,
    /// Keep the final state after the window (last hold only).
    pub freeze: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// The quadratic hop between two consecutive holds.
pub struct Bounce {
    /// Start point (previous hold).
    pub from: Point,
    /// Quadratic control point.
    pub control: Point,
    /// End point (next hold).
    pub to: Point,
    /// Active window.
    pub span: Span,
    /// Direction of travel leaving `from`, in degrees.
    pub angle_in: f64,
    /// Direction of travel arriving at `to`, in degrees.
    pub angle_out: f64,
}

impl Bounce {
    /// Path description `M from Q control to`.
    pub fn path_data(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            fmt3(self.from.x),
            fmt3(self.from.y),
            fmt3(self.control.x),
            fmt3(self.control.y),
            fmt3(self.to.x),
            fmt3(self.to.y)
        )
    }
}

#[derive(Clone, Debug, Default, serde::Serialize)]
/// Holds and bounces for one page, in time order.
pub struct IndicatorPlan {
    /// One hold per waypoint.
    pub holds: Vec<Hold>,
    /// `holds.len() - 1` bounces; `bounces[i]` joins `holds[i]` and `holds[i + 1]`.
    pub bounces: Vec<Bounce>,
    warnings: Vec<Warning>,
}

/// Waypoints for every timed, laid-out word under `page`, in document order.
pub fn collect_waypoints(
    doc: &Document,
    timeline: &Timeline,
    layout: &Layout,
    page: NodeIdx,
    config: &IndicatorConfig,
) -> Vec<Waypoint> {
    doc.descendants_of_kind(page, NodeKind::Word)
        .into_iter()
        .filter(|w| doc.is_timed(*w))
        .filter_map(|w| {
            let node_id = doc.node(w).id.clone()?;
            let span = timeline.span(w)?;
            let rect = layout.rect(w)?;
            Some(Waypoint {
                node_id,
                position: Point::new((rect.x0 + rect.x1) / 2.0, rect.y0 - config.offset_y),
                span,
            })
        })
        .collect()
}

/// Shrink each waypoint window to where its audio is loudest.
pub fn narrow_waypoints(
    waypoints: &mut [Waypoint],
    source: &dyn AmplitudeSource,
    config: &IndicatorConfig,
) {
    for wp in waypoints {
        let samples = source.samples(wp.span);
        wp.span = narrow_span(wp.span, &samples, config.bounce_begin, config.bounce_end);
    }
}

/// Turn waypoints into alternating holds and bounces.
///
/// Waypoints are ordered by begin; a window running past the next waypoint's begin is
/// clamped with a [`WarningKind::OverlappingWaypoint`] warning. A bounce takes the gap
/// between two holds, or at least `min_arc` seconds taken from the end of the earlier
/// hold. Hold rotations chain through the bounce tangents so direction never jumps.
#[tracing::instrument(skip(waypoints, config), fields(count = waypoints.len()))]
pub fn compile_waypoints(
    mut waypoints: Vec<Waypoint>,
    config: &IndicatorConfig,
) -> IndicatorPlan {
    waypoints.sort_by(|a, b| a.span.begin.total_cmp(&b.span.begin));

    let mut warnings = Vec::new();
    for i in 1..waypoints.len() {
        let next_begin = waypoints[i].span.begin;
        let prev = &mut waypoints[i - 1];
        if prev.span.end > next_begin {
            warnings.push(Warning::new(
                WarningKind::OverlappingWaypoint,
                format!(
                    "waypoint '{}' ends at {:.3}s after the next begins at {next_begin:.3}s",
                    prev.node_id, prev.span.end
                ),
            ));
            prev.span.end = next_begin.max(prev.span.begin);
        }
    }

    let mut holds: Vec<Hold> = waypoints
        .iter()
        .enumerate()
        .map(|(i, wp)| Hold {
            position: wp.position,
            span: wp.span,
            angle_begin: 0.0,
            angle_end: 0.0,
            invert: i % 2 == 1,
            freeze: i + 1 == waypoints.len(),
        })
        .collect();

    let mut bounces = Vec::with_capacity(holds.len().saturating_sub(1));
    for i in 1..holds.len() {
        let (from, to) = (holds[i - 1].position, holds[i].position);
        let end = holds[i].span.begin;
        let mut begin = holds[i - 1].span.end;
        if end - begin < config.min_arc {
            begin = holds[i - 1].span.begin.max(end - config.min_arc);
            holds[i - 1].span.end = begin;
        }
        let control = Point::new((from.x + to.x) / 2.0, from.y.min(to.y) - config.ascent);
        let (angle_in, angle_out) = bounce_angles(from, control, to);
        bounces.push(Bounce {
            from,
            control,
            to,
            span: Span { begin, end },
            angle_in,
            angle_out,
        });
    }

    for (i, bounce) in bounces.iter().enumerate() {
        holds[i].angle_end = bounce.angle_in;
        holds[i + 1].angle_begin = bounce.angle_out;
    }
    if let Some(first) = holds.first_mut() {
        first.angle_begin = first.angle_end;
    }
    if let Some(last) = holds.last_mut() {
        last.angle_end = last.angle_begin;
    }

    IndicatorPlan {
        holds,
        bounces,
        warnings,
    }
}

fn bounce_angles(from: Point, control: Point, to: Point) -> (f64, f64) {
    let mut path = BezPath::new();
    path.move_to(from);
    path.quad_to(control, to);
    match MotionPath::from_bez_path(&path) {
        Ok(p) => (p.tangent_angle(0.0), p.tangent_angle(1.0)),
        Err(_) => (0.0, 0.0),
    }
}

impl IndicatorPlan {
    /// Recovered problems found while compiling.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// True when there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }

    /// Lower the plan into an indicator group carrying animation declarations.
    ///
    /// Every window is declared with `repeatDur` equal to `dur`, which makes it
    /// half-open, so a hold and the bounce after it never both translate the indicator.
    pub fn to_scene_node(&self, id: &str, config: &IndicatorConfig) -> SceneNode {
        let r = config.radius;
        let mut group = SceneNode::new("g")
            .with_id(id)
            .with_attr("opacity", "0")
            .with_child(
                SceneNode::new("circle")
                    .with_attr("cx", "0")
                    .with_attr("cy", "0")
                    .with_attr("r", fmt3(r))
                    .with_attr("fill", config.color.as_str()),
            )
            .with_child(
                // Small pointer so rotation and mirroring read on screen.
                SceneNode::new("path")
                    .with_attr(
                        "d",
                        format!(
                            "M {} {} L {} 0 L {} {} Z",
                            fmt3(r * 0.5),
                            fmt3(-r * 0.5),
                            fmt3(r * 1.6),
                            fmt3(r * 0.5),
                            fmt3(r * 0.5)
                        ),
                    )
                    .with_attr("fill", config.color.as_str()),
            );

        if let Some(first) = self.holds.first() {
            group.children.push(
                SceneNode::new("set")
                    .with_attr("attributeName", "opacity")
                    .with_attr("to", "1")
                    .with_attr("begin", clock(first.span.begin))
                    .with_attr("dur", "0.001s")
                    .with_attr("fill", "freeze"),
            );
        }

        for hold in &self.holds {
            let pos = format!("{} {}", fmt3(hold.position.x), fmt3(hold.position.y));
            group
                .children
                .push(transform_decl(hold.span, hold.freeze, "translate", &pos, &pos));
            group.children.push(
                transform_decl(
                    hold.span,
                    hold.freeze,
                    "rotate",
                    &fmt3(hold.angle_begin),
                    &fmt3(hold.angle_end),
                )
                .with_attr("modulus", "360"),
            );
            if hold.invert {
                group
                    .children
                    .push(transform_decl(hold.span, hold.freeze, "scale", "-1 1", "-1 1"));
            }
        }

        for bounce in &self.bounces {
            group.children.push(
                windowed(SceneNode::new("animateMotion"), bounce.span, false)
                    .with_attr("path", bounce.path_data())
                    .with_attr("rotate", "auto"),
            );
        }
        group
    }
}

fn clock(secs: f64) -> String {
    format!("{}s", fmt3(secs))
}

fn windowed(node: SceneNode, span: Span, freeze: bool) -> SceneNode {
    let dur = clock(span.duration());
    node.with_attr("begin", clock(span.begin))
        .with_attr("dur", dur.clone())
        .with_attr("repeatDur", dur)
        .with_attr("fill", if freeze { "freeze" } else { "remove" })
}

fn transform_decl(span: Span, freeze: bool, kind: &str, from: &str, to: &str) -> SceneNode {
    windowed(
        SceneNode::new("animateTransform")
            .with_attr("attributeName", "transform")
            .with_attr("type", kind)
            .with_attr("from", from)
            .with_attr("to", to),
        span,
        freeze,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/indicator/waypoint.rs"]
mod tests;
