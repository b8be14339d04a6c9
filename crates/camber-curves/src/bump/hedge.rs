use camber_core::Date;
use serde::{Deserialize, Serialize};

use crate::calibrated::CalibratedCurve;
use crate::config::EngineConfig;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;
use crate::interpolator::CurveKind;
use crate::parallel::maybe_parallel_map;
use crate::product::Pricer;
use crate::quote::Quote;

/// Instrument used to measure a hedge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HedgeTarget {
    /// The tenor with this name, matched case-insensitively.
    Tenor(String),
    /// An instrument maturing on this date.
    Maturity(Date),
}

/// PV change of a hedge instrument between original and bumped curves.
///
/// For each pair `(original[i], bumped[i])` the hedge instrument is priced
/// on both and `pv(bumped) - pv(original)` is reported. The instrument is
/// built from the original curve's tenor and calibrator:
///
/// - `Tenor(name)`: that tenor; NaN if the curve has no such tenor.
/// - `Maturity(date)` on a survival curve with `date` strictly between two
///   tenor maturities: a proxy of the next tenor's product re-dated to
///   `date` and struck at the original curve's implied par quote.
/// - `Maturity(date)` otherwise: the tenor maturing closest to `date`.
///
/// A pair referring to the same curve yields 0 without pricing.
///
/// # Errors
///
/// Fails on mismatched or empty inputs, unfitted curves, or pricing
/// failures; the first failing curve in input order is reported.
pub fn hedge_curves(
    original: &[CurveHandle],
    bumped: &[CurveHandle],
    target: &HedgeTarget,
    config: &EngineConfig,
) -> CurveResult<Vec<f64>> {
    if original.is_empty() {
        return Err(CurveError::validation("hedge requires at least one curve"));
    }
    if original.len() != bumped.len() {
        return Err(CurveError::validation(format!(
            "{} original curves but {} bumped curves",
            original.len(),
            bumped.len()
        )));
    }

    maybe_parallel_map(original, config, |index, handle| {
        hedge_one(handle, &bumped[index], target).map_err(|e| e.in_curve(index, handle.name()))
    })
    .into_iter()
    .collect()
}

fn hedge_one(original: &CurveHandle, bumped: &CurveHandle, target: &HedgeTarget) -> CurveResult<f64> {
    if original.same_curve(bumped) {
        return Ok(0.0);
    }
    let base = original.read();
    let shifted = bumped.read();
    for curve in [&*base, &*shifted] {
        if !curve.is_fitted() {
            return Err(CurveError::not_fitted(curve.name()));
        }
    }
    let Some(pricer) = hedge_pricer(&base, target)? else {
        return Ok(f64::NAN);
    };
    Ok(shifted.price(pricer.as_ref())? - base.price(pricer.as_ref())?)
}

fn hedge_pricer(curve: &CalibratedCurve, target: &HedgeTarget) -> CurveResult<Option<Box<dyn Pricer>>> {
    match target {
        HedgeTarget::Tenor(name) => curve
            .tenors()
            .find(name)
            .map(|tenor| curve.create_pricer(tenor))
            .transpose(),
        HedgeTarget::Maturity(date) => {
            if curve.kind() == CurveKind::Survival {
                if let Some(pricer) = proxy_pricer(curve, *date)? {
                    return Ok(Some(pricer));
                }
            }
            curve
                .tenors()
                .iter()
                .min_by_key(|t| t.maturity().days_between(date).abs())
                .map(|tenor| curve.create_pricer(tenor))
                .transpose()
        }
    }
}

/// Par proxy at `date` when it falls strictly inside the tenor range.
fn proxy_pricer(curve: &CalibratedCurve, date: Date) -> CurveResult<Option<Box<dyn Pricer>>> {
    let tenors = curve.tenors();
    if tenors.iter().any(|t| t.maturity() == date) || !tenors.iter().any(|t| t.maturity() < date) {
        return Ok(None);
    }
    let Some(next) = tenors
        .iter()
        .filter(|t| t.maturity() > date)
        .min_by_key(|t| t.maturity())
    else {
        return Ok(None);
    };
    let Some(product) = next.product().with_maturity(date) else {
        return Ok(None);
    };

    let quote_type = product.pricing_quote_type();
    let seed = product.create_pricer(&Quote::new(0.0, quote_type), curve.calibrator())?;
    let par = seed.implied_quote(&curve.view())?;
    let pricer = product.create_pricer(&Quote::new(par, quote_type), curve.calibrator())?;
    Ok(Some(pricer))
}
