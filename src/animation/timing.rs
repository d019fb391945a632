use crate::foundation::error::{LiltError, LiltResult};
use crate::foundation::math::py_mod;

/// What happens once an animation's active window has ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Fill {
    /// Revert to the authored value.
    #[default]
    Remove,
    /// Keep the last computed value.
    Freeze,
}

impl Fill {
    /// Parse the `fill` attribute; anything but `freeze` means remove.
    pub fn parse(s: &str) -> Self {
        if s.trim() == "freeze" {
            Self::Freeze
        } else {
            Self::Remove
        }
    }
}

/// A repeat bound: a finite amount or `indefinite`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Repeat {
    /// Finite cycle count (`repeatCount`) or seconds (`repeatDur`).
    Finite(f64),
    /// No expiry.
    Indefinite,
}

/// Where an animation is within its timeline at some instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Not contributing a value.
    Inactive,
    /// Running, with the fraction through the current cycle in `[0, 1)`.
    Active(f64),
    /// Finished and holding its value at the given fraction.
    Frozen(f64),
}

impl Phase {
    /// The fraction to interpolate at, or `None` when inactive.
    pub fn fraction(self) -> Option<f64> {
        match self {
            Self::Inactive => None,
            Self::Active(f) | Self::Frozen(f) => Some(f),
        }
    }

    /// True for [`Phase::Inactive`].
    pub fn is_inactive(self) -> bool {
        matches!(self, Self::Inactive)
    }
}

/// Shared timing block of every animation primitive.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timing {
    /// Start time in seconds.
    pub begin: f64,
    /// Simple duration in seconds; `<= 0` never activates.
    pub dur: f64,
    /// Optional `repeatCount`.
    pub repeat_count: Option<Repeat>,
    /// Optional `repeatDur` in seconds.
    pub repeat_dur: Option<Repeat>,
    /// Behaviour after the active window.
    pub fill: Fill,
}

impl Timing {
    /// A single, non-repeating cycle.
    pub fn once(begin: f64, dur: f64, fill: Fill) -> Self {
        Self {
            begin,
            dur,
            repeat_count: None,
            repeat_dur: None,
            fill,
        }
    }

    /// A timing block that can never become active.
    pub fn never() -> Self {
        Self::once(0.0, 0.0, Fill::Remove)
    }

    /// Evaluate the phase at time `t`.
    pub fn phase(&self, t: f64) -> Phase {
        phase(
            self.begin,
            self.dur,
            self.repeat_count,
            self.repeat_dur,
            self.fill,
            t,
        )
    }
}

/// Phase of an animation at time `t`.
///
/// Follows declarative-animation timing: a cycle index is derived from the elapsed time,
/// the repeat bounds are checked in order (implicit single cycle, `repeatCount`,
/// `repeatDur`), and `fill` decides between [`Phase::Frozen`] and [`Phase::Inactive`] once
/// a bound has expired. The frozen fraction for an expired `repeatDur` is
/// `((repeat_dur - begin) mod dur) / dur`.
pub fn phase(
    begin: f64,
    dur: f64,
    repeat_count: Option<Repeat>,
    repeat_dur: Option<Repeat>,
    fill: Fill,
    t: f64,
) -> Phase {
    if t < begin || dur <= 0.0 || !dur.is_finite() {
        return Phase::Inactive;
    }

    let elapsed = t - begin;
    let cycle = (elapsed / dur).floor() + 1.0;
    let freeze_or_inactive = |fraction: f64| match fill {
        Fill::Freeze => Phase::Frozen(fraction),
        Fill::Remove => Phase::Inactive,
    };

    if repeat_count.is_none() && repeat_dur.is_none() && elapsed > dur {
        return freeze_or_inactive(1.0);
    }

    if let Some(Repeat::Finite(count)) = repeat_count
        && cycle > count
    {
        return freeze_or_inactive(1.0);
    }

    if let Some(Repeat::Finite(rd)) = repeat_dur
        && elapsed >= rd
    {
        return freeze_or_inactive(py_mod(rd - begin, dur) / dur);
    }

    Phase::Active(py_mod(elapsed, dur) / dur)
}

/// Parse a clock value into seconds.
///
/// Accepts `hh:mm:ss.f`, `mm:ss.f`, `Ns`, `Nms`, `Nmin`, `Nh`, or bare seconds.
pub fn parse_clock_value(s: &str) -> LiltResult<f64> {
    let s = s.trim();
    let bad = || LiltError::parse(format!("invalid clock value '{s}'"));
    let num = |v: &str| v.trim().parse::<f64>().map_err(|_| bad());

    let secs = if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(bad());
        }
        let mut total = 0.0;
        for (i, part) in parts.iter().rev().enumerate() {
            total += num(part)? * 60f64.powi(i as i32);
        }
        total
    } else if let Some(v) = s.strip_suffix("ms") {
        num(v)? / 1000.0
    } else if let Some(v) = s.strip_suffix("min") {
        num(v)? * 60.0
    } else if let Some(v) = s.strip_suffix('h') {
        num(v)? * 3600.0
    } else if let Some(v) = s.strip_suffix('s') {
        num(v)?
    } else {
        num(s)?
    };

    if !secs.is_finite() {
        return Err(bad());
    }
    Ok(secs)
}

/// Parse `repeatCount` (a plain number) or `indefinite`.
pub fn parse_repeat_count(s: &str) -> LiltResult<Repeat> {
    let s = s.trim();
    if s == "indefinite" {
        return Ok(Repeat::Indefinite);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(Repeat::Finite)
        .ok_or_else(|| LiltError::parse(format!("invalid repeatCount '{s}'")))
}

/// Parse `repeatDur` (a clock value) or `indefinite`.
pub fn parse_repeat_dur(s: &str) -> LiltResult<Repeat> {
    if s.trim() == "indefinite" {
        return Ok(Repeat::Indefinite);
    }
    parse_clock_value(s).map(Repeat::Finite)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
