//! Interpolator strategies.
//!
//! An interpolator turns the points stored by calibration into the curve's
//! public value at any date. Simple kinds read their own points (discount
//! factors, survival probabilities); composite kinds combine an internal
//! target curve with parent curves (a commodity forward from spot, a lease
//! curve and a discount curve; an FX cross from two legs).
//!
//! | Strategy | Kind | Target | Parents |
//! |----------|------|--------|---------|
//! | [`DiscountInterpolator`] | Discount | self | none |
//! | [`SurvivalInterpolator`] | Survival | self | none |
//! | [`ValueInterpolator`] | Value | self | none |
//! | [`CommodityInterpolator`] | Commodity | lease DF | discount |
//! | [`FxParityInterpolator`] | Fx | basis | base and quote discount |
//! | [`FxTriangulatedInterpolator`] | Fx | self | two FX legs |
//! | [`InflationInterpolator`] | Inflation | real DF | nominal discount |

mod commodity;
mod discount;
mod fx;
mod inflation;
mod survival;
mod value;

pub use commodity::CommodityInterpolator;
pub use discount::DiscountInterpolator;
pub use fx::{FxParityInterpolator, FxTriangulatedInterpolator, TriangulationLeg};
pub use inflation::InflationInterpolator;
pub use survival::SurvivalInterpolator;
pub use value::ValueInterpolator;

use std::fmt;

use camber_core::{Date, DayCountConvention};
use camber_math::interpolation::{ExtrapolationMethod, InterpolationMethod};
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;

/// What a calibrated curve's values represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    /// Discount factors.
    Discount,
    /// Survival probabilities.
    Survival,
    /// Commodity forward prices.
    Commodity,
    /// FX forward outrights.
    Fx,
    /// Forward index levels.
    Inflation,
    /// Directly quoted values.
    Value,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurveKind::Discount => "Discount",
            CurveKind::Survival => "Survival",
            CurveKind::Commodity => "Commodity",
            CurveKind::Fx => "Fx",
            CurveKind::Inflation => "Inflation",
            CurveKind::Value => "Value",
        };
        f.write_str(name)
    }
}

/// Search interval for one bootstrapped point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveBounds {
    /// Initial lower end of the bracket.
    pub lower: f64,
    /// Initial upper end of the bracket.
    pub upper: f64,
    /// The bracket never grows below this value.
    pub floor: f64,
}

impl SolveBounds {
    /// Bounds for discount-factor-like targets.
    pub const DISCOUNT: SolveBounds = SolveBounds {
        lower: 0.5,
        upper: 1.2,
        floor: 1e-10,
    };

    /// Bounds for survival probabilities.
    pub const PROBABILITY: SolveBounds = SolveBounds {
        lower: 0.5,
        upper: 1.0,
        floor: 1e-12,
    };
}

impl Default for SolveBounds {
    fn default() -> Self {
        Self {
            lower: -1.0,
            upper: 1.0,
            floor: f64::NEG_INFINITY,
        }
    }
}

/// Curve-kind strategy computing values from stored points.
///
/// Implementations must keep `value_between(d1, d2)` consistent with
/// `value(d2) / value(d1)` unless the kind defines range values
/// differently (see [`SurvivalInterpolator`]).
pub trait CurveInterpolator: Send + Sync + fmt::Debug {
    /// Kind of curve this strategy produces.
    fn kind(&self) -> CurveKind;

    /// Value at `date`, reading `target` and any parent curves.
    fn value(&self, target: &Curve, date: Date) -> CurveResult<f64>;

    /// Value over `[start, end]`, by default the ratio of point values.
    fn value_between(&self, target: &Curve, start: Date, end: Date) -> CurveResult<f64> {
        let v0 = self.value(target, start)?;
        if v0 == 0.0 {
            return Err(CurveError::domain(format!(
                "{} value is zero at {start}, ratio undefined",
                self.kind()
            )));
        }
        Ok(self.value(target, end)? / v0)
    }

    /// Curves read by this strategy.
    fn component_curves(&self) -> Vec<CurveHandle> {
        Vec::new()
    }

    /// Value pinned at the as-of date before any tenor is solved.
    fn anchor(&self) -> Option<f64> {
        None
    }

    /// Search interval for a bootstrapped target point.
    fn solve_bounds(&self) -> SolveBounds {
        SolveBounds::default()
    }

    /// Template for an internal target curve, when calibration populates a
    /// helper curve rather than the curve itself.
    fn internal_target(&self, _as_of: Date, _day_count: DayCountConvention) -> Option<Curve> {
        None
    }
}

/// A curve seen through its interpolator.
///
/// Pricers value instruments against a view: the stored target points
/// interpreted by the curve's strategy. During calibration the view wraps
/// the working target, so trial points are priced without copying.
#[derive(Debug, Clone, Copy)]
pub struct CurveView<'a> {
    interpolator: &'a dyn CurveInterpolator,
    target: &'a Curve,
}

impl<'a> CurveView<'a> {
    /// Creates a view of `target` through `interpolator`.
    pub fn new(interpolator: &'a dyn CurveInterpolator, target: &'a Curve) -> Self {
        Self {
            interpolator,
            target,
        }
    }

    /// As-of date of the underlying curve.
    pub fn as_of(&self) -> Date {
        self.target.as_of()
    }

    /// Kind of the viewed curve.
    pub fn kind(&self) -> CurveKind {
        self.interpolator.kind()
    }

    /// Curve value at `date`.
    pub fn value(&self, date: Date) -> CurveResult<f64> {
        self.interpolator.value(self.target, date)
    }

    /// Curve value over `[start, end]`.
    pub fn value_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        self.interpolator.value_between(self.target, start, end)
    }

    /// Year fraction from the as-of date on the curve's day count.
    pub fn year_fraction(&self, date: Date) -> f64 {
        self.target
            .day_count()
            .year_fraction(self.target.as_of(), date)
    }
}

/// Reads a parent curve's value at `date`.
pub(crate) fn parent_value(parent: &CurveHandle, date: Date) -> CurveResult<f64> {
    parent.read().value(date)
}

/// Empty log-linear target for discount-factor-like helper curves.
pub(crate) fn discount_target(as_of: Date, day_count: DayCountConvention) -> Curve {
    Curve::new(as_of)
        .with_day_count(day_count)
        .with_interpolation(InterpolationMethod::LogLinear)
        .with_extrapolation(ExtrapolationMethod::Flat, ExtrapolationMethod::Linear)
}
