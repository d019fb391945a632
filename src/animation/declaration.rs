use crate::animation::path::PathCache;
use crate::animation::primitive::{AnimationPrimitive, Orient, PrimitiveKind, TransformKind};
use crate::animation::timing::{
    Fill, Timing, parse_clock_value, parse_repeat_count, parse_repeat_dur,
};
use crate::foundation::error::{LiltError, LiltResult, Warning, WarningKind};
use crate::scene::node::SceneNode;

/// Id a declaration retargets to through `href` (`#id` or bare `id`).
pub(crate) fn href_target(node: &SceneNode) -> Option<&str> {
    node.attr("href")
        .or_else(|| node.attr("xlink:href"))
        .map(|h| h.trim().trim_start_matches('#'))
        .filter(|h| !h.is_empty())
}

/// Parse one declaration node into a primitive targeting `target`.
///
/// Problems that leave the declaration meaningless (unknown tag, missing `to`) are
/// returned as errors. A bad timing block or an unparsable motion path instead degrade the
/// primitive to permanently inactive and push a warning.
pub(crate) fn parse_declaration(
    node: &SceneNode,
    target: &str,
    paths: &PathCache,
    warnings: &mut Vec<Warning>,
) -> LiltResult<AnimationPrimitive> {
    let timing = match parse_timing(node) {
        Ok(timing) => timing,
        Err(e) => {
            warnings.push(Warning::new(
                WarningKind::Parse,
                format!("<{}> on '{target}': {e}", node.tag),
            ));
            Timing::never()
        }
    };

    let required = |name: &str| {
        node.attr(name).map(str::to_string).ok_or_else(|| {
            LiltError::parse(format!("<{}> on '{target}' is missing '{name}'", node.tag))
        })
    };

    let (attribute, kind) = match node.tag.as_str() {
        "set" => (
            required("attributeName")?,
            PrimitiveKind::Set { to: required("to")? },
        ),
        "animate" => (
            required("attributeName")?,
            PrimitiveKind::Interpolate {
                from: required("from")?,
                to: required("to")?,
                modulus: parse_modulus(node.attr("modulus"))?,
            },
        ),
        "animateTransform" => (
            node.attr("attributeName").unwrap_or("transform").to_string(),
            PrimitiveKind::Transform {
                kind: TransformKind::parse(&required("type")?)?,
                from: required("from")?,
                to: required("to")?,
                modulus: parse_modulus(node.attr("modulus"))?,
            },
        ),
        "animateMotion" => {
            let path = match node.attr("path") {
                Some(d) => match paths.get_or_parse(d) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        warnings.push(Warning::new(
                            WarningKind::Parse,
                            format!("<animateMotion> on '{target}': {e}"),
                        ));
                        None
                    }
                },
                None => {
                    warnings.push(Warning::new(
                        WarningKind::Parse,
                        format!("<animateMotion> on '{target}' has no path"),
                    ));
                    None
                }
            };
            (
                "transform".to_string(),
                PrimitiveKind::Motion {
                    path,
                    orient: Orient::parse(node.attr("rotate")),
                },
            )
        }
        other => {
            return Err(LiltError::parse(format!(
                "<{other}> is not an animation declaration"
            )));
        }
    };

    Ok(AnimationPrimitive {
        target: target.to_string(),
        attribute,
        timing,
        kind,
    })
}

fn parse_timing(node: &SceneNode) -> LiltResult<Timing> {
    let begin = node.attr("begin").map(parse_clock_value).transpose()?.unwrap_or(0.0);
    let dur = node
        .attr("dur")
        .ok_or_else(|| LiltError::parse("missing 'dur'"))
        .and_then(parse_clock_value)?;
    Ok(Timing {
        begin,
        dur,
        repeat_count: node.attr("repeatCount").map(parse_repeat_count).transpose()?,
        repeat_dur: node.attr("repeatDur").map(parse_repeat_dur).transpose()?,
        fill: node.attr("fill").map(Fill::parse).unwrap_or_default(),
    })
}

fn parse_modulus(s: Option<&str>) -> LiltResult<Vec<f64>> {
    let Some(s) = s else {
        return Ok(Vec::new());
    };
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<f64>()
                .map_err(|_| LiltError::parse(format!("invalid modulus '{p}'")))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/declaration.rs"]
mod tests;
