use camber_core::Date;
use log::debug;

use super::{check_layout, prepare_target, Calibrator, FitContext};
use crate::error::CurveResult;
use crate::handle::CurveHandle;

/// Calibrator for curves whose points are the quotes themselves.
///
/// Each tenor's quote, expressed in its product's pricing convention, is
/// stored at the tenor's curve date. No solving takes place.
#[derive(Debug, Clone)]
pub struct DirectCalibrator {
    as_of: Date,
    settle: Date,
    parents: Vec<CurveHandle>,
}

impl DirectCalibrator {
    /// Creates a direct calibrator.
    #[must_use]
    pub fn new(as_of: Date, settle: Date) -> Self {
        Self {
            as_of,
            settle,
            parents: Vec::new(),
        }
    }

    /// Declares a prerequisite curve.
    #[must_use]
    pub fn with_parent(mut self, parent: CurveHandle) -> Self {
        self.parents.push(parent);
        self
    }
}

impl Calibrator for DirectCalibrator {
    fn as_of(&self) -> Date {
        self.as_of
    }

    fn settle(&self) -> Date {
        self.settle
    }

    fn parents(&self) -> Vec<CurveHandle> {
        self.parents.clone()
    }

    fn fit(&self, ctx: &mut FitContext<'_>, from_index: usize) -> CurveResult<()> {
        check_layout(ctx, self.as_of, from_index)?;
        prepare_target(ctx, self.as_of, from_index)?;
        for tenor in ctx.tenors.iter().skip(from_index) {
            let value = tenor.quote_as(tenor.product().pricing_quote_type())?;
            ctx.target.set_point(tenor.curve_date(), value)?;
            debug!("{}: tenor '{}' set at {} -> {value}", ctx.curve_name, tenor.name(), tenor.curve_date());
        }
        Ok(())
    }
}
