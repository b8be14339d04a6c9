use camber_core::Date;

use super::{CurveInterpolator, CurveKind, SolveBounds};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};

/// Survival probabilities.
///
/// Range values are conditional probabilities `Q(end) / Q(start)` clamped to
/// `[0, 1]`. A start with zero survival probability means the name has
/// already defaulted: the result is 1 for an empty or backward range and 0
/// otherwise, never NaN.
///
/// A negative probability, stored or interpolated, is a domain error unless
/// the strategy was built with [`SurvivalInterpolator::allowing_negative`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SurvivalInterpolator {
    allow_negative: bool,
}

impl SurvivalInterpolator {
    /// Strategy rejecting negative probabilities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy passing negative probabilities through.
    #[must_use]
    pub fn allowing_negative() -> Self {
        Self { allow_negative: true }
    }

    fn check(&self, date: Date, q: f64) -> CurveResult<f64> {
        if q < 0.0 && !self.allow_negative {
            return Err(CurveError::domain(format!(
                "negative survival probability {q} at {date}"
            )));
        }
        Ok(q)
    }
}

impl CurveInterpolator for SurvivalInterpolator {
    fn kind(&self) -> CurveKind {
        CurveKind::Survival
    }

    fn value(&self, target: &Curve, date: Date) -> CurveResult<f64> {
        if !self.allow_negative {
            if let Some((at, q)) = target.points().find(|(_, q)| *q < 0.0) {
                self.check(at, q)?;
            }
        }
        self.check(date, target.value(date)?)
    }

    fn value_between(&self, target: &Curve, start: Date, end: Date) -> CurveResult<f64> {
        let q_start = self.value(target, start)?;
        if q_start <= 0.0 {
            return Ok(if end <= start { 1.0 } else { 0.0 });
        }
        let q_end = self.value(target, end)?;
        Ok((q_end / q_start).clamp(0.0, 1.0))
    }

    fn anchor(&self) -> Option<f64> {
        Some(1.0)
    }

    fn solve_bounds(&self) -> SolveBounds {
        SolveBounds::PROBABILITY
    }
}
