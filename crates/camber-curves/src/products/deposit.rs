use std::any::Any;
use std::sync::Arc;

use camber_core::{Currency, Date, DayCountConvention};

use super::{check_dates, positive_value};
use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::interpolator::CurveView;
use crate::product::{Pricer, Product};
use crate::quote::{Quote, QuoteType};

/// Money-market deposit paying simple interest at maturity.
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    start: Date,
    maturity: Date,
    currency: Currency,
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a deposit accruing on ACT/360.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if `maturity <= start`.
    pub fn new(start: Date, maturity: Date, currency: Currency) -> CurveResult<Self> {
        check_dates("Deposit", start, maturity)?;
        Ok(Self {
            start,
            maturity,
            currency,
            day_count: DayCountConvention::Act360,
        })
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Accrual fraction.
    pub fn accrual(&self) -> f64 {
        self.day_count.year_fraction(self.start, self.maturity)
    }
}

impl Product for Deposit {
    fn name(&self) -> &'static str {
        "Deposit"
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
        self.accrual()
    }

    fn pricing_quote_type(&self) -> QuoteType {
        QuoteType::Rate
    }

    fn create_pricer(&self, quote: &Quote, _calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        Ok(Box::new(DepositPricer {
            start: self.start,
            end: self.maturity,
            accrual: self.accrual(),
            rate: quote.value,
        }))
    }

    fn with_maturity(&self, maturity: Date) -> Option<Arc<dyn Product>> {
        let deposit = Self::new(self.start, maturity, self.currency).ok()?;
        Some(Arc::new(deposit.with_day_count(self.day_count)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct DepositPricer {
    start: Date,
    end: Date,
    accrual: f64,
    rate: f64,
}

impl Pricer for DepositPricer {
    // Forward value at the start date of lending one unit.
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let df_start = curve.value(self.start)?;
        let df_end = curve.value(self.end)?;
        Ok(df_end * (1.0 + self.rate * self.accrual) - df_start)
    }

    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let df_start = curve.value(self.start)?;
        let df_end = positive_value(curve, self.end)?;
        Ok((df_start / df_end - 1.0) / self.accrual)
    }
}
