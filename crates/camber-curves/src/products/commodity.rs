use std::any::Any;
use std::sync::Arc;

use camber_core::{Currency, Date, DayCountConvention};

use super::check_dates;
use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::interpolator::CurveView;
use crate::product::{Pricer, Product};
use crate::quote::{Quote, QuoteType};

/// Commodity forward delivering at a fixed price.
///
/// The delivery price mirrors the tenor's quote.
#[derive(Debug, Clone, PartialEq)]
pub struct CommodityForward {
    start: Date,
    delivery: Date,
    currency: Currency,
    delivery_price: f64,
}

impl CommodityForward {
    /// Creates a forward.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if `delivery <= start`.
    pub fn new(start: Date, delivery: Date, currency: Currency, delivery_price: f64) -> CurveResult<Self> {
        check_dates("CommodityForward", start, delivery)?;
        Ok(Self {
            start,
            delivery,
            currency,
            delivery_price,
        })
    }

    /// Contract delivery price.
    pub fn delivery_price(&self) -> f64 {
        self.delivery_price
    }
}

impl Product for CommodityForward {
    fn name(&self) -> &'static str {
        "CommodityForward"
    }

    fn start(&self) -> Date {
        self.start
    }

    fn maturity(&self) -> Date {
        self.delivery
    }

    fn currency(&self) -> Currency {
        self.currency
    }

    fn term(&self) -> f64 {
        DayCountConvention::Act365Fixed.year_fraction(self.start, self.delivery)
    }

    fn pricing_quote_type(&self) -> QuoteType {
        QuoteType::Price
    }

    fn create_pricer(&self, quote: &Quote, _calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        Ok(Box::new(CommodityForwardPricer {
            delivery: self.delivery,
            price: quote.value,
        }))
    }

    fn sync_quote(&self, quote: &Quote) -> Option<Arc<dyn Product>> {
        if quote.quote_type != QuoteType::Price {
            return None;
        }
        Some(Arc::new(Self {
            delivery_price: quote.value,
            ..self.clone()
        }))
    }

    fn with_maturity(&self, maturity: Date) -> Option<Arc<dyn Product>> {
        let forward = Self::new(self.start, maturity, self.currency, self.delivery_price).ok()?;
        Some(Arc::new(forward))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct CommodityForwardPricer {
    delivery: Date,
    price: f64,
}

impl Pricer for CommodityForwardPricer {
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        Ok(curve.value(self.delivery)? - self.price)
    }

    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        curve.value(self.delivery)
    }
}
