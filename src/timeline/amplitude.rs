use crate::foundation::core::Span;

/// Source of per-frame audio amplitude, supplied by the host.
pub trait AmplitudeSource: Send + Sync {
    /// Non-negative amplitude samples covering `span`, evenly spaced in time.
    fn samples(&self, span: Span) -> Vec<f64>;
}

/// Amplitude source backed by a precomputed sample table.
#[derive(Clone, Debug)]
pub struct SampledAmplitude {
    /// Samples per second.
    pub rate: f64,
    /// Samples starting at time zero.
    pub samples: Vec<f64>,
}

impl AmplitudeSource for SampledAmplitude {
    fn samples(&self, span: Span) -> Vec<f64> {
        if self.rate <= 0.0 || self.samples.is_empty() {
            return Vec::new();
        }
        let len = self.samples.len();
        let start = ((span.begin.max(0.0) * self.rate).floor() as usize).min(len);
        let end = ((span.end.max(0.0) * self.rate).ceil() as usize).clamp(start, len);
        self.samples[start..end].to_vec()
    }
}

/// Narrow `span` to the part of it where the sound actually is.
///
/// Returns the sub-span from the first sample where cumulative amplitude reaches
/// `begin_fraction` of the total to the first sample where it reaches `end_fraction`.
/// Silent or empty input leaves `span` unchanged.
pub fn narrow_span(span: Span, samples: &[f64], begin_fraction: f64, end_fraction: f64) -> Span {
    let total: f64 = samples.iter().map(|a| a.abs()).sum();
    if samples.is_empty() || total <= 0.0 || !total.is_finite() {
        return span;
    }
    let (lo, hi) = if begin_fraction <= end_fraction {
        (begin_fraction, end_fraction)
    } else {
        (end_fraction, begin_fraction)
    };

    let mut hits = [None, None];
    let mut acc = 0.0;
    for (i, a) in samples.iter().enumerate() {
        acc += a.abs();
        for (slot, fraction) in hits.iter_mut().zip([lo, hi]) {
            if slot.is_none() && acc / total >= fraction {
                *slot = Some(i);
            }
        }
        if hits[1].is_some() {
            break;
        }
    }

    let last = samples.len() - 1;
    let step = span.duration() / samples.len() as f64;
    let at = |i: usize| span.begin + i as f64 * step;
    let begin = at(hits[0].unwrap_or(0));
    let end = at(hits[1].unwrap_or(last)).max(begin);
    Span { begin, end }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/amplitude.rs"]
mod tests;
