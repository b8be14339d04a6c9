//! Calibration instruments.

use std::fmt;
use std::sync::Arc;

use camber_core::Date;

use crate::bump::BumpFlags;
use crate::calibrator::Calibrator;
use crate::error::{CurveError, CurveResult};
use crate::product::{Pricer, Product};
use crate::quote::{Quote, QuoteHandler, QuoteType};

/// One calibration input: a product, its market quote and the handler for
/// that quote's convention.
///
/// The original quote is snapshotted at construction (and on
/// [`Tenor::commit_quote`]) so bumps can be undone with
/// [`Tenor::reset_quote`].
#[derive(Clone)]
pub struct Tenor {
    name: String,
    product: Arc<dyn Product>,
    quote: Quote,
    original_quote: Quote,
    market_pv: f64,
    weight: f64,
    curve_date: Date,
    handler: Arc<dyn QuoteHandler>,
}

impl Tenor {
    /// Creates a tenor whose curve date is the product maturity.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::QuoteConversionNotSupported` if the handler does
    /// not support the quote's convention, or `CurveError::Validation` for a
    /// non-finite quote.
    pub fn new(
        name: impl Into<String>,
        product: Arc<dyn Product>,
        quote: Quote,
        handler: Arc<dyn QuoteHandler>,
    ) -> CurveResult<Self> {
        let name = name.into();
        if !handler.supports(quote.quote_type) {
            return Err(CurveError::conversion_not_supported(
                handler.name(),
                quote.quote_type.to_string(),
            ));
        }
        if !quote.value.is_finite() {
            return Err(CurveError::validation(format!(
                "tenor '{name}' has non-finite quote {}",
                quote.value
            )));
        }
        let curve_date = product.maturity();
        let product = product.sync_quote(&quote).unwrap_or(product);
        Ok(Self {
            name,
            product,
            quote,
            original_quote: quote,
            market_pv: 0.0,
            weight: 1.0,
            curve_date,
            handler,
        })
    }

    /// Sets the calibration weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Places the tenor's curve point on `date` instead of the maturity.
    #[must_use]
    pub fn with_curve_date(mut self, date: Date) -> Self {
        self.curve_date = date;
        self
    }

    /// Tenor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying product.
    pub fn product(&self) -> &dyn Product {
        self.product.as_ref()
    }

    /// Product maturity.
    pub fn maturity(&self) -> Date {
        self.product.maturity()
    }

    /// Date of the curve point this tenor determines.
    pub fn curve_date(&self) -> Date {
        self.curve_date
    }

    /// Calibration weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Market present value recorded by the last fit.
    pub fn market_pv(&self) -> f64 {
        self.market_pv
    }

    /// Quote handler.
    pub fn handler(&self) -> &dyn QuoteHandler {
        self.handler.as_ref()
    }

    /// Current quote in its native convention.
    pub fn quote(&self) -> Quote {
        self.quote
    }

    /// Quote as of construction or the last commit.
    pub fn original_quote(&self) -> Quote {
        self.original_quote
    }

    /// Current quote converted to `quote_type`.
    pub fn quote_as(&self, quote_type: QuoteType) -> CurveResult<f64> {
        self.handler.quote_as(self, quote_type)
    }

    /// Sets the quote through the handler.
    pub fn set_quote(&mut self, quote: Quote) -> CurveResult<()> {
        let handler = Arc::clone(&self.handler);
        handler.set_quote(self, quote)
    }

    /// Bumps the quote through the handler and returns the realized bump.
    pub fn bump(&mut self, size: f64, flags: BumpFlags) -> CurveResult<f64> {
        let handler = Arc::clone(&self.handler);
        handler.bump(self, size, flags)
    }

    /// Builds the calibration pricer for this tenor.
    pub fn create_pricer(&self, calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        self.handler.create_pricer(self, calibrator)
    }

    /// Restores the snapshotted quote.
    pub fn reset_quote(&mut self) -> CurveResult<()> {
        self.store_quote(self.original_quote)
    }

    /// Makes the current quote the new snapshot.
    pub fn commit_quote(&mut self) {
        self.original_quote = self.quote;
    }

    /// Returns true if the quote differs from the snapshot.
    pub fn is_bumped(&self) -> bool {
        self.quote != self.original_quote
    }

    /// Writes a quote already in a convention the handler supports, keeping
    /// any product mirror in step.
    ///
    /// Handlers call this after conversion; callers outside a handler
    /// should use [`Tenor::set_quote`].
    pub fn store_quote(&mut self, quote: Quote) -> CurveResult<()> {
        if !quote.value.is_finite() {
            return Err(CurveError::validation(format!(
                "tenor '{}' cannot store non-finite quote {}",
                self.name, quote.value
            )));
        }
        if let Some(product) = self.product.sync_quote(&quote) {
            self.product = product;
        }
        self.quote = quote;
        Ok(())
    }

    pub(crate) fn set_market_pv(&mut self, market_pv: f64) {
        self.market_pv = market_pv;
    }

    /// Copy of this tenor on a different product, same quote and handler.
    #[must_use]
    pub fn with_product(&self, name: impl Into<String>, product: Arc<dyn Product>) -> Self {
        let curve_date = product.maturity();
        let product = product.sync_quote(&self.quote).unwrap_or(product);
        Self {
            name: name.into(),
            product,
            curve_date,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tenor")
            .field("name", &self.name)
            .field("product", &self.product.name())
            .field("maturity", &self.maturity())
            .field("quote", &self.quote)
            .field("handler", &self.handler.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::{Deposit, FxForward};
    use crate::quote::{FxQuoteHandler, ParRateHandler};
    use approx::assert_relative_eq;
    use camber_core::Currency;

    fn deposit_tenor(rate: f64) -> Tenor {
        let start = Date::from_ymd(2025, 1, 2).unwrap();
        let deposit = Deposit::new(start, start.add_months(3).unwrap(), Currency::USD).unwrap();
        Tenor::new("3M", Arc::new(deposit), Quote::rate(rate), Arc::new(ParRateHandler)).unwrap()
    }

    #[test]
    fn test_unsupported_quote_type_rejected() {
        let start = Date::from_ymd(2025, 1, 2).unwrap();
        let deposit = Deposit::new(start, start.add_months(3).unwrap(), Currency::USD).unwrap();
        let err = Tenor::new("3M", Arc::new(deposit), Quote::price(99.0), Arc::new(ParRateHandler))
            .unwrap_err();
        assert!(matches!(err, CurveError::QuoteConversionNotSupported { .. }));
    }

    #[test]
    fn test_bump_reset_commit() {
        let mut tenor = deposit_tenor(0.012);
        let realized = tenor.bump(0.001, BumpFlags::absolute()).unwrap();
        assert_relative_eq!(realized, 0.001, epsilon = 1e-15);
        assert!(tenor.is_bumped());

        tenor.reset_quote().unwrap();
        assert_eq!(tenor.quote(), Quote::rate(0.012));
        assert!(!tenor.is_bumped());

        tenor.bump(0.002, BumpFlags::absolute()).unwrap();
        tenor.commit_quote();
        assert!(!tenor.is_bumped());
        assert_relative_eq!(tenor.original_quote().value, 0.014, epsilon = 1e-15);
    }

    #[test]
    fn test_quote_conversion_not_supported() {
        let tenor = deposit_tenor(0.012);
        assert!(matches!(
            tenor.quote_as(QuoteType::Spread),
            Err(CurveError::QuoteConversionNotSupported { .. })
        ));
        assert_relative_eq!(tenor.quote_as(QuoteType::Coupon).unwrap(), 0.012);
    }

    #[test]
    fn test_fx_bump_updates_product_mirror() {
        let start = Date::from_ymd(2025, 1, 2).unwrap();
        let forward = FxForward::new(start, start.add_months(6).unwrap(), Currency::USD, 1.10, 0.0).unwrap();
        let mut tenor = Tenor::new(
            "6M",
            Arc::new(forward),
            Quote::new(1.1050, QuoteType::FxRate),
            Arc::new(FxQuoteHandler),
        )
        .unwrap();
        let mirror = |t: &Tenor| t.product().as_any().downcast_ref::<FxForward>().unwrap().outright();
        assert_relative_eq!(mirror(&tenor), 1.1050);

        let realized = tenor.bump(10.0, BumpFlags::relative()).unwrap();
        assert_relative_eq!(realized, 10.0, epsilon = 1e-8);
        assert_relative_eq!(tenor.quote().value, 1.1060, epsilon = 1e-12);
        assert_relative_eq!(mirror(&tenor), 1.1060, epsilon = 1e-12);

        assert_relative_eq!(tenor.quote_as(QuoteType::ForwardPoints).unwrap(), 60.0, epsilon = 1e-8);
    }
}
