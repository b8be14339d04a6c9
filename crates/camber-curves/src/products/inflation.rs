use std::any::Any;
use std::sync::Arc;

use camber_core::{Currency, Date, DayCountConvention};

use super::check_dates;
use crate::calibrator::Calibrator;
use crate::error::{CurveError, CurveResult};
use crate::interpolator::CurveView;
use crate::product::{Pricer, Product};
use crate::quote::{Quote, QuoteType};

/// Zero-coupon inflation swap.
///
/// At par, index growth `I(T) / I0` matches fixed compounding `(1 + k)^T`.
#[derive(Debug, Clone, PartialEq)]
pub struct InflationSwap {
    start: Date,
    maturity: Date,
    currency: Currency,
    base_index: f64,
}

impl InflationSwap {
    /// Creates a swap referencing `base_index` at start.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for inverted dates or a
    /// non-positive base index.
    pub fn new(start: Date, maturity: Date, currency: Currency, base_index: f64) -> CurveResult<Self> {
        check_dates("InflationSwap", start, maturity)?;
        if !(base_index > 0.0) {
            return Err(CurveError::validation(format!(
                "inflation base index must be positive, got {base_index}"
            )));
        }
        Ok(Self {
            start,
            maturity,
            currency,
            base_index,
        })
    }
}

impl Product for InflationSwap {
    fn name(&self) -> &'static str {
        "InflationSwap"
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
        QuoteType::Rate
    }

    fn create_pricer(&self, quote: &Quote, _calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        Ok(Box::new(InflationSwapPricer {
            maturity: self.maturity,
            base_index: self.base_index,
            term: self.term(),
            rate: quote.value,
        }))
    }

    fn with_maturity(&self, maturity: Date) -> Option<Arc<dyn Product>> {
        let swap = Self::new(self.start, maturity, self.currency, self.base_index).ok()?;
        Some(Arc::new(swap))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct InflationSwapPricer {
    maturity: Date,
    base_index: f64,
    term: f64,
    rate: f64,
}

impl Pricer for InflationSwapPricer {
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let growth = curve.value(self.maturity)? / self.base_index;
        Ok(growth - (1.0 + self.rate).powf(self.term))
    }

    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let growth = curve.value(self.maturity)? / self.base_index;
        if growth <= 0.0 {
            return Err(CurveError::domain(format!(
                "inflation index growth {growth} is not positive"
            )));
        }
        Ok(growth.powf(1.0 / self.term) - 1.0)
    }
}
