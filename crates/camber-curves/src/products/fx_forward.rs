use std::any::Any;
use std::sync::Arc;

use camber_core::{Currency, Date, DayCountConvention};

use super::check_dates;
use crate::calibrator::Calibrator;
use crate::error::{CurveError, CurveResult};
use crate::interpolator::CurveView;
use crate::product::{Pricer, Product};
use crate::quote::{pip_size, Quote, QuoteType};

/// FX forward exchanging at a fixed outright on maturity.
///
/// The outright is a mirror of the tenor's quote: setting or bumping the
/// quote replaces the product with one carrying the new outright.
#[derive(Debug, Clone, PartialEq)]
pub struct FxForward {
    start: Date,
    maturity: Date,
    currency: Currency,
    spot: f64,
    outright: f64,
}

impl FxForward {
    /// Creates a forward on a pair quoted in `currency` per unit of base.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for inverted dates or a
    /// non-positive spot.
    pub fn new(start: Date, maturity: Date, currency: Currency, spot: f64, outright: f64) -> CurveResult<Self> {
        check_dates("FxForward", start, maturity)?;
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(CurveError::validation(format!(
                "FX spot must be positive, got {spot}"
            )));
        }
        Ok(Self {
            start,
            maturity,
            currency,
            spot,
            outright,
        })
    }

    /// Spot rate of the pair.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Contract outright.
    pub fn outright(&self) -> f64 {
        self.outright
    }

    /// Pip unit of the pair.
    pub fn pip(&self) -> f64 {
        pip_size(self.spot)
    }
}

impl Product for FxForward {
    fn name(&self) -> &'static str {
        "FxForward"
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
        QuoteType::FxRate
    }

    fn create_pricer(&self, quote: &Quote, _calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        Ok(Box::new(FxForwardPricer {
            maturity: self.maturity,
            outright: quote.value,
        }))
    }

    fn sync_quote(&self, quote: &Quote) -> Option<Arc<dyn Product>> {
        let outright = match quote.quote_type {
            QuoteType::FxRate => quote.value,
            QuoteType::ForwardPoints => self.spot + quote.value * self.pip(),
            _ => return None,
        };
        Some(Arc::new(Self {
            outright,
            ..self.clone()
        }))
    }

    fn with_maturity(&self, maturity: Date) -> Option<Arc<dyn Product>> {
        let forward = Self::new(self.start, maturity, self.currency, self.spot, self.outright).ok()?;
        Some(Arc::new(forward))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct FxForwardPricer {
    maturity: Date,
    outright: f64,
}

impl Pricer for FxForwardPricer {
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        Ok(curve.value(self.maturity)? - self.outright)
    }

    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        curve.value(self.maturity)
    }
}
