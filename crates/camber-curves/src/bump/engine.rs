use std::collections::HashSet;

use log::{info, warn};

use super::{BumpFlags, BumpSpec};
use crate::calibrated::CalibratedCurve;
use crate::config::EngineConfig;
use crate::dependency::check_acyclic;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;
use crate::parallel::maybe_parallel_map;
use crate::quote::Quote;

/// Bumps every curve and reports each curve's outcome separately.
///
/// For each curve, the selected tenors are bumped in tenor order by
/// `size * weight`, then the curve is refitted once from the lowest bumped
/// index (or fitted from scratch if it had no valid fit). The value for a
/// curve is the average realized bump, or NaN when no tenor was bumped or
/// the curve is frozen.
///
/// A failure on one curve does not stop the others. Every per-curve failure
/// comes back wrapped with the curve's index and name. If any selected
/// tenor of a curve cannot be bumped, that curve's quotes are restored and
/// it is not refitted.
///
/// # Errors
///
/// The outer result fails, before anything is mutated, on an invalid bump spec,
/// a curve listed twice, or a dependency cycle among the curves.
pub fn bump_curves_isolated(
    curves: &[CurveHandle],
    spec: &BumpSpec,
    config: &EngineConfig,
) -> CurveResult<Vec<CurveResult<f64>>> {
    spec.validate(curves.len())?;
    let mut seen = HashSet::new();
    if let Some(dup) = curves.iter().find(|h| !seen.insert(h.id())) {
        return Err(CurveError::validation(format!(
            "curve '{}' listed more than once",
            dup.name()
        )));
    }
    if spec.refit {
        check_acyclic(curves)?;
    }

    info!(
        "bump campaign: {} curves, tenors {:?}, sizes {:?}, {:?}, refit {}",
        curves.len(),
        spec.tenor_names,
        spec.sizes,
        spec.flags,
        spec.refit
    );

    Ok(maybe_parallel_map(curves, config, |index, handle| {
        bump_one(handle, spec, spec.weight_for(index)).map_err(|e| e.in_curve(index, handle.name()))
    }))
}

/// Bumps every curve and fails on the first curve, in input order, that
/// failed.
///
/// Curves after the failing one have still been processed; their tenors
/// carry the bumped quotes.
///
/// # Errors
///
/// Everything [`bump_curves_isolated`] reports, plus the first per-curve
/// failure.
pub fn bump_curves(curves: &[CurveHandle], spec: &BumpSpec, config: &EngineConfig) -> CurveResult<Vec<f64>> {
    bump_curves_isolated(curves, spec, config)?
        .into_iter()
        .collect()
}

fn bump_one(handle: &CurveHandle, spec: &BumpSpec, weight: f64) -> CurveResult<f64> {
    let mut curve = handle.write();
    if curve.is_frozen() {
        warn!("curve '{}' is frozen, bump skipped", curve.name());
        return Ok(f64::NAN);
    }

    let mut selected: Vec<(usize, f64)> = match &spec.tenor_names {
        None => (0..curve.tenors().len()).map(|i| (i, spec.size_for(0))).collect(),
        Some(names) => names
            .iter()
            .enumerate()
            .filter_map(|(k, name)| curve.tenors().index_of(name).map(|i| (i, spec.size_for(k))))
            .collect(),
    };
    selected.sort_by_key(|(i, _)| *i);
    selected.dedup_by_key(|(i, _)| *i);

    let Some(&(lowest, _)) = selected.first() else {
        return Ok(f64::NAN);
    };

    let saved: Vec<(usize, Quote)> = selected
        .iter()
        .filter_map(|&(index, _)| curve.tenors().get(index).map(|t| (index, t.quote())))
        .collect();
    let total = match bump_selected(&mut curve, &selected, weight, spec.flags) {
        Ok(total) => total,
        Err(e) => {
            restore_quotes(&mut curve, &saved)?;
            return Err(e);
        }
    };

    if spec.refit {
        if curve.is_fitted() {
            curve.refit(lowest)?;
        } else {
            curve.fit()?;
        }
    }
    Ok(total / selected.len() as f64)
}

fn bump_selected(
    curve: &mut CalibratedCurve,
    selected: &[(usize, f64)],
    weight: f64,
    flags: BumpFlags,
) -> CurveResult<f64> {
    let mut total = 0.0;
    for &(index, size) in selected {
        let tenor = curve
            .tenors_mut()
            .get_mut(index)
            .ok_or_else(|| CurveError::validation(format!("tenor index {index} out of range")))?;
        total += tenor.bump(size * weight, flags)?;
    }
    Ok(total)
}

fn restore_quotes(curve: &mut CalibratedCurve, saved: &[(usize, Quote)]) -> CurveResult<()> {
    for &(index, quote) in saved {
        if let Some(tenor) = curve.tenors_mut().get_mut(index) {
            tenor.store_quote(quote)?;
        }
    }
    Ok(())
}
