use camber_core::DayCountConvention;
use camber_math::solvers::{brent, expand_bracket, newton_raphson, SolverConfig};

use super::{check_native, price_in_pricing_convention, product_as, QuoteHandler, QuoteType};
use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::product::{Pricer, Product};
use crate::products::Cds;
use crate::tenor::Tenor;

/// CDS par spreads and upfront fees.
///
/// Conversion uses the credit triangle on a flat hazard rate
/// `h = s / (1 - R)` and a flat continuously compounded discount rate:
///
/// ```text
/// upfront = (s - c) * RA(s),   RA(s) = sum_i tau_i * exp(-(r + h) * t_i)
/// ```
///
/// where `c` is the contract's running coupon. Upfront to spread inverts
/// this numerically.
#[derive(Debug, Clone, Copy)]
pub struct CdsQuoteHandler {
    discount_rate: f64,
}

impl CdsQuoteHandler {
    /// Creates a handler discounting conversions at `discount_rate`.
    #[must_use]
    pub fn new(discount_rate: f64) -> Self {
        Self { discount_rate }
    }

    /// Flat discount rate used by conversions.
    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    /// Risky annuity of `cds` at flat spread `spread`.
    pub fn risky_annuity(&self, cds: &Cds, spread: f64) -> CurveResult<f64> {
        let hazard = spread / (1.0 - cds.recovery());
        let rate = self.discount_rate + hazard;
        let annuity = cds
            .premium_periods()?
            .iter()
            .map(|p| {
                let t = DayCountConvention::Act365Fixed.year_fraction(cds.start(), p.end);
                p.fraction * (-rate * t).exp()
            })
            .sum();
        Ok(annuity)
    }

    /// Upfront fee equivalent to `spread`.
    pub fn upfront_from_spread(&self, cds: &Cds, spread: f64) -> CurveResult<f64> {
        Ok((spread - cds.running_coupon()) * self.risky_annuity(cds, spread)?)
    }

    /// Spread equivalent to `upfront`.
    ///
    /// Newton's method from the flat-annuity guess, with the analytic slope
    /// of the upfront in the spread. A step that fails or lands on a
    /// negative spread falls back to a bracketed Brent search.
    pub fn spread_from_upfront(&self, cds: &Cds, upfront: f64) -> CurveResult<f64> {
        let coupon = cds.running_coupon();
        let lgd = 1.0 - cds.recovery();
        let schedule: Vec<(f64, f64)> = cds
            .premium_periods()?
            .iter()
            .map(|p| {
                let t = DayCountConvention::Act365Fixed.year_fraction(cds.start(), p.end);
                (p.fraction, t)
            })
            .collect();

        // (annuity, d annuity / d spread)
        let annuity = |s: f64| -> (f64, f64) {
            let rate = self.discount_rate + s / lgd;
            schedule.iter().fold((0.0, 0.0), |(a, da), &(fraction, t)| {
                let w = fraction * (-rate * t).exp();
                (a + w, da - w * t / lgd)
            })
        };
        let objective = |s: f64| (s - coupon) * annuity(s).0 - upfront;
        let slope = |s: f64| {
            let (a, da) = annuity(s);
            a + (s - coupon) * da
        };

        let config = SolverConfig::default();
        let guess = coupon + upfront / annuity(coupon).0;
        match newton_raphson(objective, slope, guess, &config) {
            Ok(result) if result.root >= 0.0 => Ok(result.root),
            _ => {
                let (lo, hi) = expand_bracket(objective, 0.0, 0.05, 0.0, 1.6, 60)?;
                Ok(brent(objective, lo, hi, &config)?.root)
            }
        }
    }
}

impl QuoteHandler for CdsQuoteHandler {
    fn name(&self) -> &'static str {
        "CdsQuote"
    }

    fn native_types(&self) -> &'static [QuoteType] {
        &[QuoteType::Spread, QuoteType::UpfrontFee]
    }

    fn convert(&self, tenor: &Tenor, value: f64, from: QuoteType, to: QuoteType) -> CurveResult<f64> {
        check_native(self, from, to)?;
        if from == to {
            return Ok(value);
        }
        let cds = product_as::<Cds>(self.name(), tenor)?;
        match to {
            QuoteType::UpfrontFee => self.upfront_from_spread(cds, value),
            _ => self.spread_from_upfront(cds, value),
        }
    }

    fn lower_bound(&self, _tenor: &Tenor, quote_type: QuoteType) -> CurveResult<Option<f64>> {
        Ok(match quote_type {
            QuoteType::Spread => Some(0.0),
            _ => None,
        })
    }

    fn create_pricer(&self, tenor: &Tenor, calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        price_in_pricing_convention(self, tenor, calibrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use camber_core::{Currency, Date};

    fn cds() -> Cds {
        let start = Date::from_ymd(2025, 3, 20).unwrap();
        Cds::new(start, start.add_years(5).unwrap(), Currency::USD, 0.01, 0.4).unwrap()
    }

    #[test]
    fn test_at_coupon_spread_has_zero_upfront() {
        let handler = CdsQuoteHandler::new(0.03);
        assert_relative_eq!(handler.upfront_from_spread(&cds(), 0.01).unwrap(), 0.0);
    }

    #[test]
    fn test_credit_triangle_inverts() {
        let handler = CdsQuoteHandler::new(0.03);
        let cds = cds();
        let upfront = handler.upfront_from_spread(&cds, 0.025).unwrap();
        assert!(upfront > 0.05 && upfront < 0.08);
        let spread = handler.spread_from_upfront(&cds, upfront).unwrap();
        assert_relative_eq!(spread, 0.025, epsilon = 1e-10);
    }

    #[test]
    fn test_spread_from_upfront_across_range() {
        let handler = CdsQuoteHandler::new(0.03);
        let cds = cds();
        for spread in [0.0005, 0.004, 0.01, 0.06, 0.15] {
            let upfront = handler.upfront_from_spread(&cds, spread).unwrap();
            let back = handler.spread_from_upfront(&cds, upfront).unwrap();
            assert_relative_eq!(back, spread, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_annuity_falls_with_spread() {
        let handler = CdsQuoteHandler::new(0.03);
        let cds = cds();
        let low = handler.risky_annuity(&cds, 0.005).unwrap();
        let high = handler.risky_annuity(&cds, 0.05).unwrap();
        assert!(low > high);
        assert!(low < 5.1);
    }
}
