use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use kurbo::{ParamCurve, ParamCurveArclen, PathEl, PathSeg};

use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::{LiltError, LiltResult};

const ARCLEN_ACCURACY: f64 = 1e-6;
const TANGENT_STEP: f64 = 1e-3;

/// A parsed motion path, parameterised by arc length.
///
/// `u = 0` is the path start and `u = 1` its end; equal steps in `u` cover equal
/// distances along the curve.
#[derive(Clone, Debug)]
pub struct MotionPath {
    start: Point,
    segments: Vec<PathSeg>,
    // Cumulative arc length at the end of each segment.
    cumulative: Vec<f64>,
}

impl MotionPath {
    /// Parse SVG path data (moves, lines, quadratic and cubic curves).
    pub fn parse(d: &str) -> LiltResult<Self> {
        let d = d.trim();
        if d.is_empty() {
            return Err(LiltError::parse("motion path must be non-empty"));
        }
        let path = BezPath::from_svg(d)
            .map_err(|e| LiltError::parse(format!("invalid motion path '{d}': {e}")))?;
        Self::from_bez_path(&path)
    }

    /// Build from an already-constructed path.
    pub fn from_bez_path(path: &BezPath) -> LiltResult<Self> {
        let start = match path.elements().first() {
            Some(PathEl::MoveTo(p)) => *p,
            _ => return Err(LiltError::parse("motion path must start with a move")),
        };

        let segments: Vec<PathSeg> = path.segments().collect();
        let mut cumulative = Vec::with_capacity(segments.len());
        let mut total = 0.0;
        for seg in &segments {
            total += seg.arclen(ARCLEN_ACCURACY);
            cumulative.push(total);
        }

        Ok(Self {
            start,
            segments,
            cumulative,
        })
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point at normalised distance `u`, clamped to `[0, 1]`.
    pub fn point(&self, u: f64) -> Point {
        let total = self.length();
        if self.segments.is_empty() {
            return self.start;
        }
        if total <= 0.0 {
            return self.segments[0].start();
        }

        let target = u.clamp(0.0, 1.0) * total;
        let idx = self
            .cumulative
            .partition_point(|&c| c < target)
            .min(self.segments.len() - 1);
        let seg = &self.segments[idx];
        let seg_start = if idx == 0 {
            0.0
        } else {
            self.cumulative[idx - 1]
        };
        let seg_len = self.cumulative[idx] - seg_start;
        let t = if seg_len > 0.0 {
            seg.inv_arclen((target - seg_start).min(seg_len), ARCLEN_ACCURACY)
        } else {
            0.0
        };
        seg.eval(t)
    }

    /// Direction of travel at `u`, in degrees, from a small finite difference.
    ///
    /// Near the end the difference is taken backwards so the sample stays on the path.
    pub fn tangent_angle(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        let (a, b) = if u + TANGENT_STEP <= 1.0 {
            (self.point(u), self.point(u + TANGENT_STEP))
        } else {
            (self.point(u - TANGENT_STEP), self.point(u))
        };
        (b.y - a.y).atan2(b.x - a.x).to_degrees()
    }
}

/// Parsed-path cache keyed by the raw path description.
///
/// Entries are only ever added. Reads take a shared lock so a cache populated up front
/// can be shared by concurrent snapshot queries.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: RwLock<HashMap<String, Arc<MotionPath>>>,
}

impl PathCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached parse of `d`, parsing and inserting it on first use.
    pub fn get_or_parse(&self, d: &str) -> LiltResult<Arc<MotionPath>> {
        if let Ok(entries) = self.entries.read()
            && let Some(hit) = entries.get(d)
        {
            return Ok(Arc::clone(hit));
        }

        let parsed = Arc::new(MotionPath::parse(d)?);
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LiltError::Other(anyhow::anyhow!("path cache lock poisoned")))?;
        Ok(Arc::clone(
            entries.entry(d.to_string()).or_insert(parsed),
        ))
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True when nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/path.rs"]
mod tests;
