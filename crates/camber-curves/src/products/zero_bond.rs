use std::any::Any;
use std::sync::Arc;

use camber_core::{Currency, Date, DayCountConvention};

use super::{check_dates, positive_value};
use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::interpolator::CurveView;
use crate::product::{Pricer, Product};
use crate::quote::{Quote, QuoteType};

/// Zero-coupon bond redeeming 100 at maturity, priced forward to its start.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroBond {
    start: Date,
    maturity: Date,
    currency: Currency,
}

impl ZeroBond {
    /// Creates a zero-coupon bond.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if `maturity <= start`.
    pub fn new(start: Date, maturity: Date, currency: Currency) -> CurveResult<Self> {
        check_dates("ZeroBond", start, maturity)?;
        Ok(Self {
            start,
            maturity,
            currency,
        })
    }
}

impl Product for ZeroBond {
    fn name(&self) -> &'static str {
        "ZeroBond"
    }

    fn start(&self) -> Date {
        self.start
    }

    fn maturity(&self) -> Date {
        self.maturity
    }

    fn currency(&self) -> Currency {
        self.currency
    }

    fn term(&self) -> f64 {
        DayCountConvention::Act365Fixed.year_fraction(self.start, self.maturity)
    }

    fn pricing_quote_type(&self) -> QuoteType {
        QuoteType::Price
    }

    fn create_pricer(&self, quote: &Quote, _calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        Ok(Box::new(ZeroBondPricer {
            start: self.start,
            maturity: self.maturity,
            price: quote.value,
        }))
    }

    fn with_maturity(&self, maturity: Date) -> Option<Arc<dyn Product>> {
        Some(Arc::new(Self::new(self.start, maturity, self.currency).ok()?))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct ZeroBondPricer {
    start: Date,
    maturity: Date,
    price: f64,
}

impl Pricer for ZeroBondPricer {
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let df_start = positive_value(curve, self.start)?;
        Ok(100.0 * curve.value(self.maturity)? / df_start)
    }

    fn market_pv(&self) -> f64 {
        self.price
    }

    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        self.pv(curve)
    }
}
