use camber_core::{Date, DayCountConvention};

use super::{discount_target, parent_value, CurveInterpolator, CurveKind, SolveBounds};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;

/// Forward index levels from real and nominal discount curves.
///
/// `I(d) = I0 * R(d) / N(d) * s(month(d)) / s(month(base))`, where `R` is the
/// real discount factor held in the internal target, `N` is the nominal
/// discount parent and `s` are monthly seasonality factors.
#[derive(Debug, Clone)]
pub struct InflationInterpolator {
    base_index: f64,
    base_date: Date,
    nominal: CurveHandle,
    seasonality: [f64; 12],
}

impl InflationInterpolator {
    /// Creates the strategy without seasonality.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a non-positive base index.
    pub fn new(base_index: f64, base_date: Date, nominal: CurveHandle) -> CurveResult<Self> {
        if !(base_index > 0.0 && base_index.is_finite()) {
            return Err(CurveError::validation(format!(
                "base index must be positive, got {base_index}"
            )));
        }
        Ok(Self {
            base_index,
            base_date,
            nominal,
            seasonality: [1.0; 12],
        })
    }

    /// Sets multiplicative seasonality factors, January first.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if any factor is not positive.
    pub fn with_seasonality(mut self, factors: [f64; 12]) -> CurveResult<Self> {
        if let Some(bad) = factors.iter().find(|f| !(**f > 0.0 && f.is_finite())) {
            return Err(CurveError::validation(format!(
                "seasonality factors must be positive, got {bad}"
            )));
        }
        self.seasonality = factors;
        Ok(self)
    }

    /// Index fixing at the base date.
    pub fn base_index(&self) -> f64 {
        self.base_index
    }

    fn seasonal_factor(&self, date: Date) -> f64 {
        let month = |d: Date| (d.month() - 1) as usize;
        self.seasonality[month(date)] / self.seasonality[month(self.base_date)]
    }
}

impl CurveInterpolator for InflationInterpolator {
    fn kind(&self) -> CurveKind {
        CurveKind::Inflation
    }

    fn value(&self, target: &Curve, date: Date) -> CurveResult<f64> {
        let real = target.value(date)?;
        let nominal = parent_value(&self.nominal, date)?;
        Ok(self.base_index * real / nominal * self.seasonal_factor(date))
    }

    fn component_curves(&self) -> Vec<CurveHandle> {
        vec![self.nominal.clone()]
    }

    fn anchor(&self) -> Option<f64> {
        Some(1.0)
    }

    fn solve_bounds(&self) -> SolveBounds {
        SolveBounds::DISCOUNT
    }

    fn internal_target(&self, as_of: Date, day_count: DayCountConvention) -> Option<Curve> {
        Some(discount_target(as_of, day_count))
    }
}
