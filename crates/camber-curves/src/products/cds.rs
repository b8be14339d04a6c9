use std::any::Any;
use std::sync::Arc;

use camber_core::{Currency, Date, DayCountConvention};

use super::{accrual_periods, check_dates, AccrualPeriod};
use crate::calibrator::Calibrator;
use crate::error::{CurveError, CurveResult};
use crate::handle::CurveHandle;
use crate::interpolator::CurveView;
use crate::product::{Pricer, Product};
use crate::quote::{Quote, QuoteType};

/// Credit default swap with quarterly premium payments.
///
/// The running coupon is the contractual coupon used when the tenor is
/// quoted as an upfront fee; a spread-quoted tenor prices at par.
#[derive(Debug, Clone, PartialEq)]
pub struct Cds {
    start: Date,
    maturity: Date,
    currency: Currency,
    running_coupon: f64,
    recovery: f64,
}

impl Cds {
    /// Premium frequency in months.
    pub const PAYMENT_MONTHS: i32 = 3;

    /// Creates a CDS.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for inverted dates or a recovery
    /// outside `[0, 1)`.
    pub fn new(
        start: Date,
        maturity: Date,
        currency: Currency,
        running_coupon: f64,
        recovery: f64,
    ) -> CurveResult<Self> {
        check_dates("Cds", start, maturity)?;
        if !(0.0..1.0).contains(&recovery) {
            return Err(CurveError::validation(format!(
                "CDS recovery must lie in [0, 1), got {recovery}"
            )));
        }
        Ok(Self {
            start,
            maturity,
            currency,
            running_coupon,
            recovery,
        })
    }

    /// Contractual running coupon.
    pub fn running_coupon(&self) -> f64 {
        self.running_coupon
    }

    /// Recovery rate.
    pub fn recovery(&self) -> f64 {
        self.recovery
    }

    /// Premium accrual periods on ACT/360.
    pub fn premium_periods(&self) -> CurveResult<Vec<AccrualPeriod>> {
        accrual_periods(
            self.start,
            self.maturity,
            Self::PAYMENT_MONTHS,
            DayCountConvention::Act360,
        )
    }
}

impl Product for Cds {
    fn name(&self) -> &'static str {
        "Cds"
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
        QuoteType::Spread
    }

    fn create_pricer(&self, quote: &Quote, calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        let discount = calibrator.discount().ok_or_else(|| {
            CurveError::domain("Cds pricing requires a calibrator with a discount curve")
        })?;
        Ok(Box::new(CdsPricer {
            discount,
            start: self.start,
            periods: self.premium_periods()?,
            recovery: self.recovery,
            spread: quote.value,
        }))
    }

    fn with_maturity(&self, maturity: Date) -> Option<Arc<dyn Product>> {
        let cds = Self::new(
            self.start,
            maturity,
            self.currency,
            self.running_coupon,
            self.recovery,
        )
        .ok()?;
        Some(Arc::new(cds))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct CdsPricer {
    discount: CurveHandle,
    start: Date,
    periods: Vec<AccrualPeriod>,
    recovery: f64,
    spread: f64,
}

impl CdsPricer {
    fn survival(curve: &CurveView<'_>, date: Date) -> CurveResult<f64> {
        let q = curve.value(date)?;
        if q < 0.0 {
            return Err(CurveError::domain(format!(
                "negative survival probability {q} at {date}"
            )));
        }
        Ok(q)
    }

    /// Returns `(protection, risky annuity)`.
    fn legs(&self, curve: &CurveView<'_>) -> CurveResult<(f64, f64)> {
        let discount = self.discount.read();
        let mut protection = 0.0;
        let mut annuity = 0.0;
        let mut q_prev = Self::survival(curve, self.start)?;
        for period in &self.periods {
            let q = Self::survival(curve, period.end)?;
            let df = discount.value(period.end)?;
            protection += (1.0 - self.recovery) * df * (q_prev - q);
            annuity += period.fraction * df * 0.5 * (q_prev + q);
            q_prev = q;
        }
        Ok((protection, annuity))
    }
}

impl Pricer for CdsPricer {
    // Protection buyer at par spread.
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let (protection, annuity) = self.legs(curve)?;
        Ok(protection - self.spread * annuity)
    }

    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64> {
        let (protection, annuity) = self.legs(curve)?;
        if annuity <= 0.0 {
            return Err(CurveError::domain(format!(
                "CDS risky annuity {annuity} is not positive"
            )));
        }
        Ok(protection / annuity)
    }
}
