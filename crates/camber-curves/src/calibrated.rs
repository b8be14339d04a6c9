//! Calibrated curves.
//!
//! A [`CalibratedCurve`] composes the four parts of a curve: the stored
//! points, the tenors they are calibrated to, the calibrator that derives
//! them and the interpolator that gives them a meaning. Every curve kind is
//! the same type with different strategies plugged in.
//!
//! # Storage target
//!
//! Most interpolators read the curve's own points, and calibration writes
//! straight into them. Composite kinds (commodity, FX parity, inflation)
//! instead calibrate a helper curve, such as implied lease discount factors,
//! and compute public values from that helper plus their parent curves.
//! [`StorageTarget`] records which curve a fit populates. It is resolved
//! when the interpolator is set. For an internal target the curve's own
//! points stay empty: public values depend on live parents, so
//! [`CalibratedCurve::public_points`] computes them on every call.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --fit()--> Fitting --> Fitted
//!                                  \-> PartiallyFitted { from }   (refit(k), k > 0)
//! any failure ------------------------> Uninitialized
//! ```

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use camber_core::Date;
use log::debug;

use crate::calibrator::{Calibrator, FitContext};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::handle::{CurveHandle, CurveId};
use crate::interpolator::{CurveInterpolator, CurveKind, CurveView};
use crate::product::Pricer;
use crate::tenor::Tenor;
use crate::tenor_set::TenorSet;

/// Fit state of a calibrated curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitState {
    /// Never fitted, or the last fit failed, or inputs changed since.
    Uninitialized,
    /// A fit is running.
    Fitting,
    /// Fully fitted.
    Fitted,
    /// Fitted, the last pass re-deriving points from tenor `from` on.
    PartiallyFitted {
        /// First re-derived tenor index.
        from: usize,
    },
}

impl FitState {
    /// Returns true if the curve may be queried.
    pub fn is_fitted(self) -> bool {
        matches!(self, FitState::Fitted | FitState::PartiallyFitted { .. })
    }
}

/// The curve a fit populates.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageTarget {
    /// The curve's own points.
    SelfCurve,
    /// A helper curve owned by the calibrated curve.
    Internal(Curve),
}

/// A curve with its tenors, calibrator and interpolator.
#[derive(Debug)]
pub struct CalibratedCurve {
    id: CurveId,
    name: String,
    curve: Curve,
    storage: StorageTarget,
    tenors: TenorSet,
    calibrator: Arc<dyn Calibrator>,
    interpolator: Arc<dyn CurveInterpolator>,
    state: FitState,
    frozen: bool,
}

impl CalibratedCurve {
    /// Creates an unfitted curve with no tenors.
    ///
    /// The storage target is taken from the interpolator: an internal
    /// helper curve on the same as-of and day count if the strategy asks
    /// for one, the curve itself otherwise.
    pub fn new(
        name: impl Into<String>,
        curve: Curve,
        calibrator: Arc<dyn Calibrator>,
        interpolator: Arc<dyn CurveInterpolator>,
    ) -> Self {
        let storage = Self::resolve_storage(&curve, interpolator.as_ref());
        Self {
            id: CurveId::new(),
            name: name.into(),
            curve,
            storage,
            tenors: TenorSet::new(),
            calibrator,
            interpolator,
            state: FitState::Uninitialized,
            frozen: false,
        }
    }

    /// Replaces the tenor set.
    #[must_use]
    pub fn with_tenors(mut self, tenors: TenorSet) -> Self {
        self.tenors = tenors;
        self.state = FitState::Uninitialized;
        self
    }

    fn resolve_storage(curve: &Curve, interpolator: &dyn CurveInterpolator) -> StorageTarget {
        interpolator
            .internal_target(curve.as_of(), curve.day_count())
            .map_or(StorageTarget::SelfCurve, StorageTarget::Internal)
    }

    /// Independent copy with a fresh identity.
    ///
    /// Tenors and points are copied; strategies and parent handles are
    /// shared.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        Self {
            id: CurveId::new(),
            name: self.name.clone(),
            curve: self.curve.clone(),
            storage: self.storage.clone(),
            tenors: self.tenors.clone(),
            calibrator: Arc::clone(&self.calibrator),
            interpolator: Arc::clone(&self.interpolator),
            state: self.state,
            frozen: self.frozen,
        }
    }

    /// Identity.
    pub fn id(&self) -> CurveId {
        self.id
    }

    /// Name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of values this curve produces.
    pub fn kind(&self) -> CurveKind {
        self.interpolator.kind()
    }

    /// Valuation date.
    pub fn as_of(&self) -> Date {
        self.curve.as_of()
    }

    /// The curve's own points.
    ///
    /// Holds no points when calibration writes to an internal target; see
    /// [`CalibratedCurve::public_points`].
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The curve populated by calibration.
    pub fn target(&self) -> &Curve {
        match &self.storage {
            StorageTarget::SelfCurve => &self.curve,
            StorageTarget::Internal(curve) => curve,
        }
    }

    /// Storage target.
    pub fn storage(&self) -> &StorageTarget {
        &self.storage
    }

    /// Calibration tenors.
    pub fn tenors(&self) -> &TenorSet {
        &self.tenors
    }

    /// Mutable calibration tenors.
    ///
    /// Quote edits take effect on the next fit or refit.
    pub fn tenors_mut(&mut self) -> &mut TenorSet {
        &mut self.tenors
    }

    /// Appends a tenor. The curve must be fitted again afterwards.
    pub fn add_tenor(&mut self, tenor: Tenor) -> CurveResult<()> {
        self.tenors.add(tenor)?;
        self.state = FitState::Uninitialized;
        Ok(())
    }

    /// Calibrator.
    pub fn calibrator(&self) -> &dyn Calibrator {
        self.calibrator.as_ref()
    }

    /// Replaces the calibrator. The curve must be fitted again afterwards.
    pub fn set_calibrator(&mut self, calibrator: Arc<dyn Calibrator>) {
        self.calibrator = calibrator;
        self.state = FitState::Uninitialized;
    }

    /// Interpolator.
    pub fn interpolator(&self) -> &dyn CurveInterpolator {
        self.interpolator.as_ref()
    }

    /// Replaces the interpolator, re-resolving the storage target. The
    /// curve must be fitted again afterwards.
    pub fn set_interpolator(&mut self, interpolator: Arc<dyn CurveInterpolator>) {
        self.storage = Self::resolve_storage(&self.curve, interpolator.as_ref());
        self.interpolator = interpolator;
        self.state = FitState::Uninitialized;
    }

    /// Fit state.
    pub fn state(&self) -> FitState {
        self.state
    }

    /// Returns true if the curve may be queried.
    pub fn is_fitted(&self) -> bool {
        self.state.is_fitted()
    }

    /// Returns true if refitting is currently forbidden.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes or unfreezes the curve. A frozen curve keeps its points and
    /// answers queries but refuses to fit; bump campaigns skip it.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Fits every point from scratch.
    ///
    /// # Errors
    ///
    /// Fails if the curve is frozen, depends on itself, has an unfitted
    /// parent, or a tenor cannot be solved. On failure the curve is left
    /// `Uninitialized`.
    pub fn fit(&mut self) -> CurveResult<()> {
        self.run_fit(0)
    }

    /// Re-derives points from tenor `from_index` onwards, keeping earlier
    /// points.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::NotFitted` if the curve has no valid fit to
    /// keep points from, plus every error of [`CalibratedCurve::fit`].
    pub fn refit(&mut self, from_index: usize) -> CurveResult<()> {
        if from_index > 0 && !self.is_fitted() {
            return Err(CurveError::not_fitted(&self.name));
        }
        self.run_fit(from_index)
    }

    fn run_fit(&mut self, from_index: usize) -> CurveResult<()> {
        if self.frozen {
            return Err(CurveError::domain(format!(
                "curve '{}' is frozen and cannot be refitted",
                self.name
            )));
        }
        self.check_parents()?;

        let calibrator = Arc::clone(&self.calibrator);
        let interpolator = Arc::clone(&self.interpolator);
        self.state = FitState::Fitting;

        let target = match &mut self.storage {
            StorageTarget::SelfCurve => &mut self.curve,
            StorageTarget::Internal(curve) => curve,
        };
        let mut ctx = FitContext {
            curve_name: &self.name,
            target,
            tenors: &mut self.tenors,
            interpolator: interpolator.as_ref(),
        };
        let fitted = calibrator.fit(&mut ctx, from_index);
        match fitted {
            Ok(()) => {
                self.state = if from_index == 0 {
                    FitState::Fitted
                } else {
                    FitState::PartiallyFitted { from: from_index }
                };
                debug!(
                    "{}: fitted {} tenors from index {from_index}",
                    self.name,
                    self.tenors.len()
                );
                Ok(())
            }
            Err(e) => {
                self.state = FitState::Uninitialized;
                Err(e)
            }
        }
    }

    fn check_parents(&self) -> CurveResult<()> {
        self.enumerate_parents(true)?;
        for parent in self.direct_parents() {
            if !parent.read().is_fitted() {
                return Err(CurveError::ParentNotFitted {
                    curve: self.name.clone(),
                    parent: parent.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Parents declared by the calibrator and the interpolator, without
    /// duplicates.
    pub fn direct_parents(&self) -> Vec<CurveHandle> {
        let mut seen = HashSet::new();
        self.calibrator
            .parents()
            .into_iter()
            .chain(self.interpolator.component_curves())
            .filter(|h| seen.insert(h.id()))
            .collect()
    }

    /// Parent curves, breadth first. With `recursive`, parents of parents
    /// are included, each curve once.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::DependencyCycle` if this curve is reachable
    /// from its own parents. The check compares identities before any
    /// parent is locked.
    pub fn enumerate_parents(&self, recursive: bool) -> CurveResult<Vec<CurveHandle>> {
        let mut seen = HashSet::new();
        let mut parents = Vec::new();
        let mut queue: VecDeque<(CurveHandle, String)> = self
            .direct_parents()
            .into_iter()
            .map(|h| {
                let path = format!("{} -> {}", self.name, h.name());
                (h, path)
            })
            .collect();

        while let Some((handle, path)) = queue.pop_front() {
            if handle.id() == self.id {
                return Err(CurveError::dependency_cycle(path));
            }
            if !seen.insert(handle.id()) {
                continue;
            }
            if recursive {
                let grandparents = handle.read().direct_parents();
                queue.extend(grandparents.into_iter().map(|g| {
                    let next = format!("{path} -> {}", g.name());
                    (g, next)
                }));
            }
            parents.push(handle);
        }
        Ok(parents)
    }

    fn ensure_fitted(&self) -> CurveResult<()> {
        if self.is_fitted() {
            Ok(())
        } else {
            Err(CurveError::not_fitted(&self.name))
        }
    }

    fn ensure_kind(&self, kind: CurveKind, what: &str) -> CurveResult<()> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(CurveError::domain(format!(
                "{what} requested from {} curve '{}'",
                self.kind(),
                self.name
            )))
        }
    }

    /// The fitted curve as pricers see it.
    pub fn view(&self) -> CurveView<'_> {
        CurveView::new(self.interpolator.as_ref(), self.target())
    }

    /// Value at `date`.
    pub fn value(&self, date: Date) -> CurveResult<f64> {
        self.ensure_fitted()?;
        self.interpolator.value(self.target(), date)
    }

    /// `(date, value)` at the as-of date and at every tenor date, as the
    /// curve prices them now.
    ///
    /// For curves fitted into their own points these are the stored points.
    /// Composite curves evaluate them through their parents on each call,
    /// so a parent refit shows up without refitting this curve.
    pub fn public_points(&self) -> CurveResult<Vec<(Date, f64)>> {
        self.ensure_fitted()?;
        if let StorageTarget::SelfCurve = self.storage {
            return Ok(self.curve.points().collect());
        }
        let mut dates: Vec<Date> = std::iter::once(self.as_of())
            .chain(self.tenors.iter().map(Tenor::curve_date))
            .collect();
        dates.sort();
        dates.dedup();
        dates
            .into_iter()
            .map(|d| Ok((d, self.value(d)?)))
            .collect()
    }

    /// Value over `[start, end]` as defined by the interpolator.
    pub fn value_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        self.ensure_fitted()?;
        self.interpolator.value_between(self.target(), start, end)
    }

    /// Discount factor from as-of to `date`.
    pub fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        self.ensure_kind(CurveKind::Discount, "discount factor")?;
        self.value(date)
    }

    /// Discount factor from `start` to `end`.
    pub fn discount_factor_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        self.ensure_kind(CurveKind::Discount, "discount factor")?;
        self.value_between(start, end)
    }

    /// Continuously compounded zero rate to `date` on the curve's day count.
    pub fn zero_rate(&self, date: Date) -> CurveResult<f64> {
        let df = self.discount_factor(date)?;
        let t = self.curve.day_count().year_fraction(self.as_of(), date);
        if t <= 0.0 || df <= 0.0 {
            return Err(CurveError::domain(format!(
                "zero rate undefined at {date} (t = {t}, df = {df})"
            )));
        }
        Ok(-df.ln() / t)
    }

    /// Simple forward rate over `[start, end]` on the curve's day count.
    pub fn forward_rate(&self, start: Date, end: Date) -> CurveResult<f64> {
        let ratio = self.discount_factor_between(start, end)?;
        let tau = self.curve.day_count().year_fraction(start, end);
        if tau <= 0.0 || ratio <= 0.0 {
            return Err(CurveError::domain(format!(
                "forward rate undefined over [{start}, {end}]"
            )));
        }
        Ok((1.0 / ratio - 1.0) / tau)
    }

    /// Survival probability from as-of to `date`.
    pub fn survival_probability(&self, date: Date) -> CurveResult<f64> {
        self.ensure_kind(CurveKind::Survival, "survival probability")?;
        self.value(date)
    }

    /// Survival probability to `end` conditional on survival to `start`.
    pub fn survival_probability_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        self.ensure_kind(CurveKind::Survival, "survival probability")?;
        self.value_between(start, end)
    }

    /// Forward price or rate for commodity, FX and inflation curves.
    pub fn forward(&self, date: Date) -> CurveResult<f64> {
        match self.kind() {
            CurveKind::Commodity | CurveKind::Fx | CurveKind::Inflation => self.value(date),
            other => Err(CurveError::domain(format!(
                "forward requested from {other} curve '{}'",
                self.name
            ))),
        }
    }

    /// Pricer for `tenor` built with this curve's calibrator.
    pub fn create_pricer(&self, tenor: &Tenor) -> CurveResult<Box<dyn Pricer>> {
        tenor.create_pricer(self.calibrator.as_ref())
    }

    /// Model value of `pricer` on this curve.
    pub fn price(&self, pricer: &dyn Pricer) -> CurveResult<f64> {
        self.ensure_fitted()?;
        pricer.pv(&self.view())
    }

    /// Quote implied by the fitted curve for tenor `index`, in the tenor's
    /// own convention.
    pub fn implied_quote(&self, index: usize) -> CurveResult<f64> {
        self.ensure_fitted()?;
        let tenor = self.tenors.get(index).ok_or_else(|| {
            CurveError::validation(format!(
                "curve '{}' has no tenor at index {index}",
                self.name
            ))
        })?;
        let pricer = self.create_pricer(tenor)?;
        let implied = pricer.implied_quote(&self.view())?;
        let pricing = tenor.product().pricing_quote_type();
        tenor
            .handler()
            .convert(tenor, implied, pricing, tenor.quote().quote_type)
    }

    /// Weighted model-minus-market PV for every tenor.
    pub fn repricing_errors(&self) -> CurveResult<Vec<f64>> {
        self.ensure_fitted()?;
        let view = self.view();
        self.tenors
            .iter()
            .map(|tenor| {
                let pricer = self.create_pricer(tenor)?;
                Ok(tenor.weight() * (pricer.pv(&view)? - pricer.market_pv()))
            })
            .collect()
    }
}
