//! Calibrators.
//!
//! A calibrator derives a curve's points from its tenor set. Fit runs
//! against a [`FitContext`] that exposes exactly what calibration may
//! touch: the storage target being populated, the tenors (whose derived
//! fields such as market PV a fit may refresh), and the interpolator that
//! gives trial points their meaning. Parent curves are read through
//! handles and are never mutated.

mod bootstrap;
mod direct;

pub use bootstrap::BootstrapCalibrator;
pub use direct::DirectCalibrator;

use std::fmt;

use camber_core::Date;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;
use crate::interpolator::CurveInterpolator;
use crate::tenor_set::TenorSet;

/// Everything one fit may read or write.
pub struct FitContext<'a> {
    /// Name of the curve being fitted, for logs and errors.
    pub curve_name: &'a str,
    /// Storage target receiving the fitted points.
    pub target: &'a mut Curve,
    /// Calibration instruments, sorted by maturity.
    pub tenors: &'a mut TenorSet,
    /// Strategy interpreting the target's points.
    pub interpolator: &'a dyn CurveInterpolator,
}

impl fmt::Debug for FitContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitContext")
            .field("curve_name", &self.curve_name)
            .field("points", &self.target.len())
            .field("tenors", &self.tenors.len())
            .finish_non_exhaustive()
    }
}

/// Strategy deriving curve points from tenors.
pub trait Calibrator: Send + Sync + fmt::Debug {
    /// Valuation date.
    fn as_of(&self) -> Date;

    /// Settlement date of the calibration instruments.
    fn settle(&self) -> Date;

    /// Curves that must be fitted before this calibrator runs.
    fn parents(&self) -> Vec<CurveHandle>;

    /// Discount curve offered to pricers that need one.
    fn discount(&self) -> Option<CurveHandle> {
        None
    }

    /// Populates `ctx.target` from tenors `from_index..`.
    ///
    /// With `from_index == 0` the target is rebuilt from scratch. Otherwise
    /// points belonging to earlier tenors are kept and every point from
    /// tenor `from_index`'s curve date onwards is re-derived.
    fn fit(&self, ctx: &mut FitContext<'_>, from_index: usize) -> CurveResult<()>;
}

/// Checks the tenor layout a sequential fit depends on.
pub(crate) fn check_layout(ctx: &FitContext<'_>, as_of: Date, from_index: usize) -> CurveResult<()> {
    if from_index > ctx.tenors.len() {
        return Err(CurveError::validation(format!(
            "{}: refit index {from_index} beyond {} tenors",
            ctx.curve_name,
            ctx.tenors.len()
        )));
    }
    if !ctx.tenors.is_sorted() {
        return Err(CurveError::validation(format!(
            "{}: tenors must be sorted by maturity before fitting",
            ctx.curve_name
        )));
    }
    let dates: Vec<Date> = ctx.tenors.iter().map(|t| t.curve_date()).collect();
    if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
        return Err(CurveError::validation(format!(
            "{}: curve dates must increase with maturity, {} follows {}",
            ctx.curve_name, w[1], w[0]
        )));
    }
    if ctx.interpolator.anchor().is_some() {
        if let Some(first) = dates.first().filter(|d| **d <= as_of) {
            return Err(CurveError::validation(format!(
                "{}: first curve date {first} must be after as-of {as_of}",
                ctx.curve_name
            )));
        }
    }
    Ok(())
}

/// Clears what a fit from `from_index` re-derives.
pub(crate) fn prepare_target(ctx: &mut FitContext<'_>, as_of: Date, from_index: usize) -> CurveResult<()> {
    if from_index == 0 {
        ctx.target.clear();
        if let Some(anchor) = ctx.interpolator.anchor() {
            ctx.target.set_point(as_of, anchor)?;
        }
    } else if let Some(tenor) = ctx.tenors.get(from_index) {
        ctx.target.truncate_from(tenor.curve_date());
    }
    Ok(())
}
