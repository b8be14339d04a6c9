use std::collections::HashSet;

use camber_core::Date;
use log::debug;

use crate::error::CurveResult;
use crate::handle::CurveHandle;

/// Tenor closest to a date across a curve set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosestTenor {
    /// Position of the curve in the input set.
    pub curve_index: usize,
    /// Position of the tenor in the curve's tenor set.
    pub tenor_index: usize,
    /// Tenor name.
    pub name: String,
    /// Tenor maturity.
    pub maturity: Date,
    /// Absolute distance from the requested date in days.
    pub distance_days: i64,
}

/// Tenor names across `curves` in order of first appearance, without
/// case-insensitive duplicates.
///
/// With `up_to`, only tenors maturing on or before that date are listed.
pub fn unique_tenor_names(curves: &[CurveHandle], up_to: Option<Date>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for handle in curves {
        let curve = handle.read();
        for tenor in curve.tenors() {
            if up_to.is_some_and(|limit| tenor.maturity() > limit) {
                continue;
            }
            if seen.insert(tenor.name().to_ascii_uppercase()) {
                names.push(tenor.name().to_string());
            }
        }
    }
    names
}

/// Tenor maturing closest to `date` across `curves`.
///
/// Ties go to the earlier curve, then the earlier tenor.
pub fn closest_tenor(curves: &[CurveHandle], date: Date) -> Option<ClosestTenor> {
    let mut best: Option<ClosestTenor> = None;
    for (curve_index, handle) in curves.iter().enumerate() {
        let curve = handle.read();
        for (tenor_index, tenor) in curve.tenors().iter().enumerate() {
            let distance_days = tenor.maturity().days_between(&date).abs();
            if best.as_ref().is_some_and(|b| b.distance_days <= distance_days) {
                continue;
            }
            best = Some(ClosestTenor {
                curve_index,
                tenor_index,
                name: tenor.name().to_string(),
                maturity: tenor.maturity(),
                distance_days,
            });
        }
    }
    best
}

/// Restores every tenor's snapshotted quote and refits each curve whose
/// quotes changed, from its first restored tenor.
///
/// Frozen or unfitted curves get their quotes restored without a refit.
///
/// # Errors
///
/// Stops at the first failure; calibration failures are wrapped with the
/// curve's index and name.
pub fn reset_quotes(curves: &[CurveHandle]) -> CurveResult<()> {
    for (index, handle) in curves.iter().enumerate() {
        let mut curve = handle.write();
        let first_bumped = curve.tenors().iter().position(|t| t.is_bumped());
        curve.tenors_mut().reset_quotes()?;
        if let Some(from) = first_bumped {
            if curve.is_fitted() && !curve.is_frozen() {
                curve.refit(from).map_err(|e| e.in_curve(index, handle.name()))?;
                debug!("reset_quotes: '{}' refitted from tenor {from}", curve.name());
            }
        }
    }
    Ok(())
}

/// Makes every tenor's current quote its new snapshot.
pub fn commit_quotes(curves: &[CurveHandle]) {
    for handle in curves {
        handle.write().tenors_mut().commit_quotes();
    }
}
