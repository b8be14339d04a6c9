//! Reference calibration products.
//!
//! Minimal instruments implementing [`crate::product::Product`], enough to
//! calibrate each shipped curve kind. Each carries only its start,
//! maturity, currency and the few terms its quote handler or pricer reads.

mod cds;
mod commodity;
mod deposit;
mod fx_forward;
mod inflation;
mod schedule;
mod swap;
mod zero_bond;

pub use cds::Cds;
pub use commodity::CommodityForward;
pub use deposit::Deposit;
pub use fx_forward::FxForward;
pub use inflation::InflationSwap;
pub use schedule::{accrual_periods, AccrualPeriod};
pub use swap::Swap;
pub use zero_bond::ZeroBond;

use camber_core::Date;

use crate::error::{CurveError, CurveResult};
use crate::interpolator::CurveView;

/// Fails unless `start < maturity`.
pub(crate) fn check_dates(product: &str, start: Date, maturity: Date) -> CurveResult<()> {
    if maturity <= start {
        return Err(CurveError::validation(format!(
            "{product} maturity {maturity} must be after start {start}"
        )));
    }
    Ok(())
}

/// Curve value at `date`, failing on a zero or negative discount-like value.
pub(crate) fn positive_value(curve: &CurveView<'_>, date: Date) -> CurveResult<f64> {
    let value = curve.value(date)?;
    if value <= 0.0 {
        return Err(CurveError::domain(format!(
            "{} curve value {value} at {date} is not positive",
            curve.kind()
        )));
    }
    Ok(value)
}
