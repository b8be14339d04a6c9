use camber_core::{Date, DayCountConvention};

use super::{discount_target, parent_value, CurveInterpolator, CurveKind, SolveBounds};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;

/// Commodity forwards implied by spot, a lease curve and a discount curve.
///
/// `F(d) = spot * L(d) / D(d)`, where `L` is the lease discount factor held
/// in the internal target curve and `D` comes from the discount parent.
/// Calibration solves `L`; the forward stays live against `D`.
#[derive(Debug, Clone)]
pub struct CommodityInterpolator {
    spot: f64,
    discount: CurveHandle,
}

impl CommodityInterpolator {
    /// Creates the strategy from a spot price and a discount curve.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a non-positive spot.
    pub fn new(spot: f64, discount: CurveHandle) -> CurveResult<Self> {
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(CurveError::validation(format!(
                "commodity spot must be positive, got {spot}"
            )));
        }
        Ok(Self { spot, discount })
    }

    /// Spot price.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Discount parent.
    pub fn discount(&self) -> &CurveHandle {
        &self.discount
    }
}

impl CurveInterpolator for CommodityInterpolator {
    fn kind(&self) -> CurveKind {
        CurveKind::Commodity
    }

    fn value(&self, target: &Curve, date: Date) -> CurveResult<f64> {
        let lease = target.value(date)?;
        let df = parent_value(&self.discount, date)?;
        Ok(self.spot * lease / df)
    }

    fn component_curves(&self) -> Vec<CurveHandle> {
        vec![self.discount.clone()]
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
