use std::any::Any;
use std::sync::Arc;

use camber_core::{Currency, Date, DayCountConvention};

use super::{accrual_periods, check_dates, AccrualPeriod};
use crate::calibrator::Calibrator;
use crate::error::{CurveError, CurveResult};
use crate::interpolator::CurveView;
use crate::product::{Pricer, Product};
use crate::quote::{Quote, QuoteType};

/// Fixed-for-floating swap valued single-curve.
///
/// The floating leg is worth `D(start) - D(maturity)`; only the fixed leg
/// needs a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    start: Date,
    maturity: Date,
    currency: Currency,
    fixed_months: i32,
    day_count: DayCountConvention,
}

impl Swap {
    /// Creates a swap with a fixed leg paying every `fixed_months` on 30/360.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for inverted dates or a
    /// non-positive frequency.
    pub fn new(start: Date, maturity: Date, currency: Currency, fixed_months: i32) -> CurveResult<Self> {
        check_dates("Swap", start, maturity)?;
        if fixed_months <= 0 {
            return Err(CurveError::validation(format!(
                "swap fixed frequency must be positive, got {fixed_months} months"
            )));
        }
        Ok(Self {
            start,
            maturity,
            currency,
            fixed_months,
            day_count: DayCountConvention::Thirty360,
        })
    }

    /// Sets the fixed leg day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Fixed leg accrual periods.
    pub fn fixed_periods(&self) -> CurveResult<Vec<AccrualPeriod>> {
        accrual_periods(self.start, self.maturity, self.fixed_months, self.day_count)
    }
}

impl Product for Swap {
    fn name(&self) -> &'static str {
        "Swap"
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
        QuoteType::Coupon
    }

    fn create_pricer(&self, quote: &Quote, _calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        Ok(Box::new(SwapPricer {
            start: self.start,
            end: self.maturity,
            periods: self.fixed_periods()?,
            coupon: quote.value,
        }))
    }

    fn with_maturity(&self, maturity: Date) -> Option<Arc<dyn Product>> {
        let swap = Self::new(self.start, maturity, self.currency, self.fixed_months).ok()?;
        Some(Arc::new(swap.with_day_count(self.day_count)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct SwapPricer {
    start: Date,
    end: Date,
    periods: Vec<AccrualPeriod>,
    coupon: f64,
}

impl SwapPricer {
    fn annuity(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        self.periods.iter().try_fold(0.0, |acc, p| {
            Ok(acc + p.fraction * curve.value(p.end)?)
        })
    }
}

impl Pricer for SwapPricer {
    // Receiver fixed.
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let floating = curve.value(self.start)? - curve.value(self.end)?;
        Ok(self.coupon * self.annuity(curve)? - floating)
    }

    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let annuity = self.annuity(curve)?;
        if annuity <= 0.0 {
            return Err(CurveError::domain(format!(
                "swap annuity {annuity} is not positive"
            )));
        }
        Ok((curve.value(self.start)? - curve.value(self.end)?) / annuity)
    }
}
