use std::cell::RefCell;

use camber_core::Date;
use camber_math::solvers::{bisection, brent, expand_bracket, SolverConfig};
use camber_math::MathError;
use log::debug;

use super::{check_layout, prepare_target, Calibrator, FitContext};
use crate::config::EngineConfig;
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;
use crate::interpolator::{CurveInterpolator, CurveView, SolveBounds};
use crate::product::Pricer;

/// Growth factor applied to the bracket width on each expansion round.
const BRACKET_GROWTH: f64 = 1.6;

/// Iteration budget for the bisection fallback.
const BISECTION_ITERATIONS: u32 = 200;

/// Sequential bootstrap.
///
/// Tenors are solved in maturity order. Each tenor owns one curve point at
/// its curve date, found with Brent's method so that the tenor's pricer
/// reproduces its market PV given every earlier point. If Brent runs out of
/// iterations, the same bracket is bisected instead. A refit from index
/// `k` therefore only touches points from tenor `k` onwards.
///
/// # Example
///
/// ```rust,ignore
/// let calibrator = BootstrapCalibrator::new(as_of, settle)
///     .with_discount(ois.clone())
///     .with_solver(SolverConfig::new(1e-14, 200));
/// ```
#[derive(Debug, Clone)]
pub struct BootstrapCalibrator {
    as_of: Date,
    settle: Date,
    discount: Option<CurveHandle>,
    parents: Vec<CurveHandle>,
    solver: SolverConfig,
    bracket_rounds: u32,
}

impl BootstrapCalibrator {
    /// Creates a bootstrap with default solver settings.
    #[must_use]
    pub fn new(as_of: Date, settle: Date) -> Self {
        Self::from_config(as_of, settle, &EngineConfig::default())
    }

    /// Creates a bootstrap with solver settings from `config`.
    #[must_use]
    pub fn from_config(as_of: Date, settle: Date, config: &EngineConfig) -> Self {
        Self {
            as_of,
            settle,
            discount: None,
            parents: Vec::new(),
            solver: config.solver_config(),
            bracket_rounds: config.bracket_rounds,
        }
    }

    /// Uses `discount` for pricers that need a discount curve.
    #[must_use]
    pub fn with_discount(mut self, discount: CurveHandle) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Declares an additional prerequisite curve.
    #[must_use]
    pub fn with_parent(mut self, parent: CurveHandle) -> Self {
        self.parents.push(parent);
        self
    }

    /// Overrides the root finder settings.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    fn solve_point(
        &self,
        target: &mut Curve,
        interpolator: &dyn CurveInterpolator,
        pricer: &dyn Pricer,
        date: Date,
        bounds: SolveBounds,
    ) -> CurveResult<f64> {
        let market = pricer.market_pv();
        let failure: RefCell<Option<CurveError>> = RefCell::new(None);
        let target = RefCell::new(target);

        let objective = |x: f64| -> f64 {
            let mut curve = target.borrow_mut();
            let priced = curve.set_point(date, x).and_then(|()| {
                let view = CurveView::new(interpolator, &**curve);
                pricer.pv(&view)
            });
            match priced {
                Ok(pv) => pv - market,
                Err(e) => {
                    failure.borrow_mut().get_or_insert(e);
                    f64::NAN
                }
            }
        };

        let solved = expand_bracket(
            objective,
            bounds.lower,
            bounds.upper,
            bounds.floor,
            BRACKET_GROWTH,
            self.bracket_rounds,
        )
        .and_then(|(lo, hi)| match brent(objective, lo, hi, &self.solver) {
            Err(MathError::ConvergenceFailed { iterations, .. }) => {
                debug!("brent stopped after {iterations} iterations at {date}, bisecting [{lo}, {hi}]");
                let fallback = self.solver.with_max_iterations(BISECTION_ITERATIONS);
                bisection(objective, lo, hi, &fallback)
            }
            other => other,
        });

        if let Some(e) = failure.into_inner() {
            return Err(e);
        }
        Ok(solved?.root)
    }
}

impl Calibrator for BootstrapCalibrator {
    fn as_of(&self) -> Date {
        self.as_of
    }

    fn settle(&self) -> Date {
        self.settle
    }

    fn parents(&self) -> Vec<CurveHandle> {
        self.discount.iter().chain(&self.parents).cloned().collect()
    }

    fn discount(&self) -> Option<CurveHandle> {
        self.discount.clone()
    }

    fn fit(&self, ctx: &mut FitContext<'_>, from_index: usize) -> CurveResult<()> {
        check_layout(ctx, self.as_of, from_index)?;
        prepare_target(ctx, self.as_of, from_index)?;
        let bounds = ctx.interpolator.solve_bounds();

        for index in from_index..ctx.tenors.len() {
            let Some(tenor) = ctx.tenors.get(index) else {
                break;
            };
            let name = tenor.name().to_string();
            let date = tenor.curve_date();
            let pricer = tenor.create_pricer(self)?;

            let root = self
                .solve_point(ctx.target, ctx.interpolator, pricer.as_ref(), date, bounds)
                .map_err(|e| match e {
                    CurveError::Math(m) => CurveError::calibration_failed(&name, m.to_string()),
                    other => other,
                })?;
            ctx.target.set_point(date, root)?;
            if let Some(tenor) = ctx.tenors.get_mut(index) {
                tenor.set_market_pv(pricer.market_pv());
            }
            debug!("{}: tenor '{}' fitted at {} -> {:.12}", ctx.curve_name, name, date, root);
        }
        Ok(())
    }
}
