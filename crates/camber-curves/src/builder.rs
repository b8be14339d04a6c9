//! Fluent construction of calibrated curves.

use std::sync::Arc;

use camber_core::{Date, Period};

use crate::calibrated::CalibratedCurve;
use crate::calibrator::Calibrator;
use crate::config::{CurveConventions, TermConvention};
use crate::error::CurveResult;
use crate::interpolator::CurveInterpolator;
use crate::product::Product;
use crate::products::{Deposit, Swap};
use crate::quote::{ParRateHandler, Quote, QuoteHandler};
use crate::tenor::Tenor;
use crate::tenor_set::TenorSet;

/// Builder collecting tenors under one set of term conventions.
///
/// Tenors are kept in the order added and sorted by maturity once, in
/// [`CurveBuilder::build`].
///
/// # Example
///
/// ```rust,ignore
/// let curve = CurveBuilder::from_conventions("USD-SOFR", as_of, &conventions)?
///     .deposit("1M", 0.0430)?
///     .deposit("3M", 0.0432)?
///     .swap("2Y", 0.0395, 12)?
///     .build(Arc::new(BootstrapCalibrator::new(as_of, settle)), Arc::new(DiscountInterpolator))?;
/// ```
#[derive(Debug)]
pub struct CurveBuilder {
    name: String,
    as_of: Date,
    convention: TermConvention,
    rate_handler: Arc<dyn QuoteHandler>,
    tenors: Vec<Tenor>,
    frozen: bool,
}

impl CurveBuilder {
    /// Starts a curve with explicit conventions.
    pub fn new(name: impl Into<String>, as_of: Date, convention: TermConvention) -> Self {
        Self {
            name: name.into(),
            as_of,
            convention,
            rate_handler: Arc::new(ParRateHandler),
            tenors: Vec::new(),
            frozen: false,
        }
    }

    /// Starts a curve using the convention registered under `name`.
    pub fn from_conventions(name: &str, as_of: Date, conventions: &CurveConventions) -> CurveResult<Self> {
        let convention = conventions.get(name)?.clone();
        Ok(Self::new(name, as_of, convention))
    }

    /// Settlement date under the builder's conventions.
    pub fn settle(&self) -> Date {
        self.convention.settle_date(self.as_of)
    }

    /// Adds a deposit tenor named after its period.
    pub fn deposit(self, period: &str, rate: f64) -> CurveResult<Self> {
        let period = Period::parse(period)?;
        let start = self.settle();
        let deposit = Deposit::new(start, start.advance(period)?, self.convention.currency)?;
        let handler = Arc::clone(&self.rate_handler);
        self.product(period.to_string(), Arc::new(deposit), Quote::rate(rate), handler)
    }

    /// Adds a par swap tenor named after its period.
    pub fn swap(self, period: &str, rate: f64, fixed_months: i32) -> CurveResult<Self> {
        let period = Period::parse(period)?;
        let start = self.settle();
        let swap = Swap::new(start, start.advance(period)?, self.convention.currency, fixed_months)?;
        let handler = Arc::clone(&self.rate_handler);
        self.product(period.to_string(), Arc::new(swap), Quote::rate(rate), handler)
    }

    /// Adds a tenor for any product.
    pub fn product(
        self,
        name: impl Into<String>,
        product: Arc<dyn Product>,
        quote: Quote,
        handler: Arc<dyn QuoteHandler>,
    ) -> CurveResult<Self> {
        let tenor = Tenor::new(name, product, quote, handler)?;
        Ok(self.tenor(tenor))
    }

    /// Adds a prepared tenor.
    #[must_use]
    pub fn tenor(mut self, tenor: Tenor) -> Self {
        self.tenors.push(tenor);
        self
    }

    /// Builds the curve frozen.
    #[must_use]
    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    /// Sorts the tenors and assembles an unfitted curve.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if two tenors share a curve date.
    pub fn build(
        self,
        calibrator: Arc<dyn Calibrator>,
        interpolator: Arc<dyn CurveInterpolator>,
    ) -> CurveResult<CalibratedCurve> {
        let mut tenors = TenorSet::from_tenors(self.tenors)?;
        tenors.sort();
        let mut curve = CalibratedCurve::new(
            self.name,
            self.convention.curve(self.as_of),
            calibrator,
            interpolator,
        )
        .with_tenors(tenors);
        curve.set_frozen(self.frozen);
        Ok(curve)
    }
}
