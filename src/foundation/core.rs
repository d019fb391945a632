use crate::foundation::error::{LiltError, LiltResult};

pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Index of a node inside an arena (scene or document).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    pub(crate) fn from_usize(i: usize) -> Self {
        Self(u32::try_from(i).unwrap_or(u32::MAX))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A closed time window in seconds, `begin <= end`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    /// Start of the window.
    pub begin: f64,
    /// End of the window.
    pub end: f64,
}

impl Span {
    /// Build a span, rejecting reversed or non-finite bounds.
    pub fn new(begin: f64, end: f64) -> LiltResult<Self> {
        if !begin.is_finite() || !end.is_finite() {
            return Err(LiltError::validation("span bounds must be finite"));
        }
        if end < begin {
            return Err(LiltError::validation(format!(
                "span end {end} is before begin {begin}"
            )));
        }
        Ok(Self { begin, end })
    }

    /// Length of the window in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.begin
    }

    /// Smallest span covering both.
    pub fn union(self, other: Span) -> Span {
        Span {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// True when `t` lies inside `[begin, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.begin <= t && t < self.end
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Zero-based output frame number.
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Half-open range of frames `[start, end)`.
pub struct FrameRange {
    /// First frame in the range.
    pub start: FrameIndex,
    /// One past the last frame.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> LiltResult<Self> {
        if start.0 > end.0 {
            return Err(LiltError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames covered.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// True when the range covers no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Iterate frame indices in order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Rational frame rate.
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a frame rate, rejecting zero terms.
    pub fn new(num: u32, den: u32) -> LiltResult<Self> {
        if den == 0 {
            return Err(LiltError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LiltError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Presentation time of a frame in seconds.
    pub fn frame_time_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Frames needed to cover `secs` (rounded up, at least one when `secs > 0`).
    pub fn frames_for_secs(self, secs: f64) -> u64 {
        if secs <= 0.0 || !secs.is_finite() {
            return 0;
        }
        (secs * self.as_f64()).ceil() as u64
    }

    /// Frames whose presentation time falls inside `span`.
    pub fn frames_in_span(self, span: Span) -> FrameRange {
        let start = (span.begin.max(0.0) * self.as_f64()).ceil() as u64;
        let end = self.frames_for_secs(span.end).max(start);
        FrameRange {
            start: FrameIndex(start),
            end: FrameIndex(end),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
