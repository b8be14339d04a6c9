use camber_core::Date;

use super::{CurveInterpolator, CurveKind};
use crate::curve::Curve;
use crate::error::CurveResult;

/// Values quoted directly, with no anchor and no parents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueInterpolator;

impl CurveInterpolator for ValueInterpolator {
    fn kind(&self) -> CurveKind {
        CurveKind::Value
    }

    fn value(&self, target: &Curve, date: Date) -> CurveResult<f64> {
        target.value(date)
    }
}
