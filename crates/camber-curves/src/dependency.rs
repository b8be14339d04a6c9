//! Dependency discovery and fit ordering across a curve set.
//!
//! Parents must be fitted before their dependents. [`fit_order`] walks the
//! parent graph depth first and returns every reachable curve, leaves
//! first, or the path of the first cycle it meets. Identities are compared
//! before any curve is locked, and each curve is locked at most once, for
//! the duration of reading its parent list.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::error::{CurveError, CurveResult};
use crate::handle::{CurveHandle, CurveId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Orders `curves` and all their transitive parents so that every curve
/// follows its parents.
///
/// Curves appear once each; among independent curves the input order is
/// kept.
///
/// # Errors
///
/// Returns `CurveError::DependencyCycle` with the offending path.
pub fn fit_order(curves: &[CurveHandle]) -> CurveResult<Vec<CurveHandle>> {
    let mut marks = HashMap::new();
    let mut stack = Vec::new();
    let mut order = Vec::new();
    for curve in curves {
        visit(curve, &mut marks, &mut stack, &mut order)?;
    }
    Ok(order)
}

fn visit(
    curve: &CurveHandle,
    marks: &mut HashMap<CurveId, Mark>,
    stack: &mut Vec<CurveHandle>,
    order: &mut Vec<CurveHandle>,
) -> CurveResult<()> {
    match marks.get(&curve.id()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack
                .iter()
                .position(|h| h.same_curve(curve))
                .unwrap_or_default();
            let path: Vec<&str> = stack[start..]
                .iter()
                .map(CurveHandle::name)
                .chain(std::iter::once(curve.name()))
                .collect();
            return Err(CurveError::dependency_cycle(path.join(" -> ")));
        }
        None => {}
    }

    marks.insert(curve.id(), Mark::Visiting);
    stack.push(curve.clone());
    let parents = curve.read().direct_parents();
    for parent in &parents {
        visit(parent, marks, stack, order)?;
    }
    stack.pop();
    marks.insert(curve.id(), Mark::Done);
    order.push(curve.clone());
    Ok(())
}

/// Fits a curve set in dependency order.
///
/// Every curve in `curves` is fitted. Parents reached outside the set are
/// fitted only if they are not fitted yet. Frozen curves are skipped with a
/// warning.
///
/// # Errors
///
/// Stops at the first cycle or fit failure.
pub fn fit_all(curves: &[CurveHandle]) -> CurveResult<()> {
    let requested: HashSet<CurveId> = curves.iter().map(CurveHandle::id).collect();
    for handle in fit_order(curves)? {
        let mut curve = handle.write();
        if curve.is_frozen() {
            warn!("fit_all: curve '{}' is frozen, skipped", curve.name());
            continue;
        }
        if !requested.contains(&handle.id()) && curve.is_fitted() {
            continue;
        }
        curve.fit()?;
        debug!("fit_all: fitted '{}'", curve.name());
    }
    Ok(())
}

/// Fails if any curve in the set depends on itself.
pub fn check_acyclic(curves: &[CurveHandle]) -> CurveResult<()> {
    fit_order(curves).map(|_| ())
}
