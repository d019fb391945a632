use std::sync::Arc;

use smallvec::{SmallVec, smallvec};

use crate::animation::interp::interpolate;
use crate::animation::path::MotionPath;
use crate::animation::timing::Timing;
use crate::foundation::error::{LiltError, LiltResult};
use crate::foundation::math::fmt3;

/// Transform function named by an `animateTransform` `type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransformKind {
    /// `translate(tx [ty])`
    Translate,
    /// `scale(sx [sy])`
    Scale,
    /// `rotate(angle [cx cy])`
    Rotate,
    /// `skewX(angle)`
    SkewX,
    /// `skewY(angle)`
    SkewY,
}

impl TransformKind {
    /// Parse the `type` attribute.
    pub fn parse(s: &str) -> LiltResult<Self> {
        match s.trim() {
            "translate" => Ok(Self::Translate),
            "scale" => Ok(Self::Scale),
            "rotate" => Ok(Self::Rotate),
            "skewX" => Ok(Self::SkewX),
            "skewY" => Ok(Self::SkewY),
            other => Err(LiltError::parse(format!("unknown transform type '{other}'"))),
        }
    }

    /// Function name as written in a transform list.
    pub fn name(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Scale => "scale",
            Self::Rotate => "rotate",
            Self::SkewX => "skewX",
            Self::SkewY => "skewY",
        }
    }

    /// Accumulator bucket the fragment lands in.
    pub fn family(self) -> TransformFamily {
        match self {
            Self::Translate => TransformFamily::Translate,
            Self::Rotate => TransformFamily::Rotate,
            Self::Scale => TransformFamily::Scale,
            Self::SkewX | Self::SkewY => TransformFamily::Skew,
        }
    }
}

/// Transform buckets, in the order they are flattened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum TransformFamily {
    /// Translations, including motion-path positions.
    Translate,
    /// Rotations, including motion-path orientation.
    Rotate,
    /// Scales.
    Scale,
    /// Skews.
    Skew,
}

/// How a motion animation orients its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orient {
    /// No rotation.
    #[default]
    None,
    /// Rotate along the direction of travel.
    Auto,
    /// Rotate against the direction of travel.
    AutoReverse,
}

impl Orient {
    /// Parse the `rotate` attribute of a motion declaration.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("auto") => Self::Auto,
            Some("auto-reverse") => Self::AutoReverse,
            _ => Self::None,
        }
    }
}

/// Variant-specific payload of a primitive.
#[derive(Clone, Debug)]
pub enum PrimitiveKind {
    /// Write `to` while active.
    Set {
        /// Value written.
        to: String,
    },
    /// Blend `from` towards `to`.
    Interpolate {
        /// Start value.
        from: String,
        /// End value.
        to: String,
        /// Per-number modulus, see [`crate::interpolate`].
        modulus: Vec<f64>,
    },
    /// Blend transform arguments and append `kind(value)` to the target's transform.
    Transform {
        /// Transform function.
        kind: TransformKind,
        /// Start arguments.
        from: String,
        /// End arguments.
        to: String,
        /// Per-number modulus.
        modulus: Vec<f64>,
    },
    /// Move along a path; `None` when the path failed to parse.
    Motion {
        /// Parsed path, shared through the path cache.
        path: Option<Arc<MotionPath>>,
        /// Orientation mode.
        orient: Orient,
    },
}

/// One time-bounded attribute animation bound to a target node id.
#[derive(Clone, Debug)]
pub struct AnimationPrimitive {
    /// Id of the node written to (resolved by lookup, never owned).
    pub target: String,
    /// Attribute written (the transform list for transform and motion).
    pub attribute: String,
    /// Begin, duration, repeat and fill.
    pub timing: Timing,
    /// What the primitive does when active.
    pub kind: PrimitiveKind,
}

/// A pending transform-list entry, concatenated into the final attribute on flatten.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// Attribute the fragment belongs to.
    pub attribute: String,
    /// Flatten bucket.
    pub family: TransformFamily,
    /// Rendered function, e.g. `translate(1.000 2.000)`.
    pub value: String,
}

/// Result of evaluating an active primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Overwrite an attribute.
    Attribute {
        /// Attribute name.
        name: String,
        /// New value.
        value: String,
    },
    /// Append to the transform accumulator.
    Fragments(SmallVec<[Fragment; 2]>),
}

impl AnimationPrimitive {
    /// Evaluate at time `t`.
    ///
    /// Inactive primitives yield `Ok(None)`. Endpoint values that cannot be blended are
    /// returned as [`LiltError::IncompatibleValues`].
    pub fn evaluate(&self, t: f64) -> LiltResult<Option<Effect>> {
        let Some(fraction) = self.timing.phase(t).fraction() else {
            return Ok(None);
        };

        let effect = match &self.kind {
            PrimitiveKind::Set { to } => Effect::Attribute {
                name: self.attribute.clone(),
                value: to.clone(),
            },
            PrimitiveKind::Interpolate { from, to, modulus } => Effect::Attribute {
                name: self.attribute.clone(),
                value: interpolate(from, to, fraction, modulus)?,
            },
            PrimitiveKind::Transform {
                kind,
                from,
                to,
                modulus,
            } => {
                let args = interpolate(from, to, fraction, modulus)?;
                Effect::Fragments(smallvec![Fragment {
                    attribute: self.attribute.clone(),
                    family: kind.family(),
                    value: format!("{}({args})", kind.name()),
                }])
            }
            PrimitiveKind::Motion { path, orient } => {
                let Some(path) = path else {
                    return Ok(None);
                };
                let p = path.point(fraction);
                let mut fragments: SmallVec<[Fragment; 2]> = smallvec![Fragment {
                    attribute: self.attribute.clone(),
                    family: TransformFamily::Translate,
                    value: format!("translate({} {})", fmt3(p.x), fmt3(p.y)),
                }];
                let angle = match orient {
                    Orient::None => None,
                    Orient::Auto => Some(path.tangent_angle(fraction)),
                    Orient::AutoReverse => Some(path.tangent_angle(fraction) + 180.0),
                };
                if let Some(angle) = angle {
                    fragments.push(Fragment {
                        attribute: self.attribute.clone(),
                        family: TransformFamily::Rotate,
                        value: format!("rotate({})", fmt3(angle)),
                    });
                }
                Effect::Fragments(fragments)
            }
        };
        Ok(Some(effect))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/primitive.rs"]
mod tests;
