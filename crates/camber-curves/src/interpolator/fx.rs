use camber_core::{Date, DayCountConvention};

use super::{discount_target, parent_value, CurveInterpolator, CurveKind, SolveBounds};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;

/// FX forwards from covered interest parity with a calibrated basis.
///
/// For a pair quoted as units of quote currency per unit of base currency,
/// `F(d) = spot * D_base(d) / D_quote(d) * B(d)`. The basis factor `B` is the
/// internal target curve, pinned to 1 at as-of.
#[derive(Debug, Clone)]
pub struct FxParityInterpolator {
    spot: f64,
    base_discount: CurveHandle,
    quote_discount: CurveHandle,
}

impl FxParityInterpolator {
    /// Creates the strategy.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a non-positive spot or when both
    /// discount handles refer to the same curve.
    pub fn new(spot: f64, base_discount: CurveHandle, quote_discount: CurveHandle) -> CurveResult<Self> {
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(CurveError::validation(format!(
                "FX spot must be positive, got {spot}"
            )));
        }
        if base_discount.same_curve(&quote_discount) {
            return Err(CurveError::validation(format!(
                "FX parity needs two distinct discount curves, got '{}' twice",
                base_discount.name()
            )));
        }
        Ok(Self {
            spot,
            base_discount,
            quote_discount,
        })
    }

    /// Spot rate.
    pub fn spot(&self) -> f64 {
        self.spot
    }
}

impl CurveInterpolator for FxParityInterpolator {
    fn kind(&self) -> CurveKind {
        CurveKind::Fx
    }

    fn value(&self, target: &Curve, date: Date) -> CurveResult<f64> {
        let basis = target.value(date)?;
        let base_df = parent_value(&self.base_discount, date)?;
        let quote_df = parent_value(&self.quote_discount, date)?;
        Ok(self.spot * base_df / quote_df * basis)
    }

    fn component_curves(&self) -> Vec<CurveHandle> {
        vec![self.base_discount.clone(), self.quote_discount.clone()]
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

/// One leg of an FX cross.
#[derive(Debug, Clone)]
pub struct TriangulationLeg {
    /// FX curve of the leg.
    pub curve: CurveHandle,
    /// Use the reciprocal of the leg's forward.
    pub invert: bool,
}

impl TriangulationLeg {
    /// Leg used as quoted.
    #[must_use]
    pub fn direct(curve: CurveHandle) -> Self {
        Self {
            curve,
            invert: false,
        }
    }

    /// Leg used through its reciprocal.
    #[must_use]
    pub fn inverted(curve: CurveHandle) -> Self {
        Self { curve, invert: true }
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        let v = parent_value(&self.curve, date)?;
        if self.invert {
            if v == 0.0 {
                return Err(CurveError::domain(format!(
                    "cannot invert zero forward on '{}' at {date}",
                    self.curve.name()
                )));
            }
            Ok(1.0 / v)
        } else {
            Ok(v)
        }
    }
}

/// FX cross forwards through two legs, e.g. EUR/JPY from EUR/USD and USD/JPY.
///
/// Holds no points of its own; every value is the product of the legs.
#[derive(Debug, Clone)]
pub struct FxTriangulatedInterpolator {
    first: TriangulationLeg,
    second: TriangulationLeg,
}

impl FxTriangulatedInterpolator {
    /// Creates a cross from two legs.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if both legs use the same curve.
    pub fn new(first: TriangulationLeg, second: TriangulationLeg) -> CurveResult<Self> {
        if first.curve.same_curve(&second.curve) {
            return Err(CurveError::validation(format!(
                "FX cross needs two distinct legs, got '{}' twice",
                first.curve.name()
            )));
        }
        Ok(Self { first, second })
    }
}

impl CurveInterpolator for FxTriangulatedInterpolator {
    fn kind(&self) -> CurveKind {
        CurveKind::Fx
    }

    fn value(&self, _target: &Curve, date: Date) -> CurveResult<f64> {
        Ok(self.first.value(date)? * self.second.value(date)?)
    }

    fn component_curves(&self) -> Vec<CurveHandle> {
        vec![self.first.curve.clone(), self.second.curve.clone()]
    }
}
