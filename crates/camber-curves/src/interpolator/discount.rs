use camber_core::Date;

use super::{CurveInterpolator, CurveKind, SolveBounds};
use crate::curve::Curve;
use crate::error::CurveResult;

/// Discount factors stored directly on the curve, pinned to 1 at as-of.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountInterpolator;

impl CurveInterpolator for DiscountInterpolator {
    fn kind(&self) -> CurveKind {
        CurveKind::Discount
    }

    fn value(&self, target: &Curve, date: Date) -> CurveResult<f64> {
        target.value(date)
    }

    fn anchor(&self) -> Option<f64> {
        Some(1.0)
    }

    fn solve_bounds(&self) -> SolveBounds {
        SolveBounds::DISCOUNT
    }
}
