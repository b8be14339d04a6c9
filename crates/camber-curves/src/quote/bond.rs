use super::{check_native, price_in_pricing_convention, QuoteHandler, QuoteType};
use crate::calibrator::Calibrator;
use crate::error::{CurveError, CurveResult};
use crate::product::Pricer;
use crate::tenor::Tenor;

/// Zero-coupon bond prices and annually compounded yields.
///
/// `P = 100 / (1 + y)^T` with `T` the product term in years.
#[derive(Debug, Clone, Copy, Default)]
pub struct BondPriceHandler;

impl BondPriceHandler {
    fn term(tenor: &Tenor) -> CurveResult<f64> {
        let term = tenor.product().term();
        if term <= 0.0 {
            return Err(CurveError::domain(format!(
                "bond on tenor '{}' has non-positive term {term}",
                tenor.name()
            )));
        }
        Ok(term)
    }

    /// Price per 100 for an annually compounded yield.
    pub fn price_from_yield(y: f64, term: f64) -> CurveResult<f64> {
        if y <= -1.0 {
            return Err(CurveError::domain(format!("yield {y} is at or below -100%")));
        }
        Ok(100.0 / (1.0 + y).powf(term))
    }

    /// Annually compounded yield for a price per 100.
    pub fn yield_from_price(price: f64, term: f64) -> CurveResult<f64> {
        if price <= 0.0 {
            return Err(CurveError::domain(format!("bond price {price} is not positive")));
        }
        Ok((100.0 / price).powf(1.0 / term) - 1.0)
    }
}

impl QuoteHandler for BondPriceHandler {
    fn name(&self) -> &'static str {
        "BondPrice"
    }

    fn native_types(&self) -> &'static [QuoteType] {
        &[QuoteType::Price, QuoteType::Yield]
    }

    fn convert(&self, tenor: &Tenor, value: f64, from: QuoteType, to: QuoteType) -> CurveResult<f64> {
        check_native(self, from, to)?;
        match (from, to) {
            (QuoteType::Yield, QuoteType::Price) => Self::price_from_yield(value, Self::term(tenor)?),
            (QuoteType::Price, QuoteType::Yield) => Self::yield_from_price(value, Self::term(tenor)?),
            _ => Ok(value),
        }
    }

    fn lower_bound(&self, _tenor: &Tenor, quote_type: QuoteType) -> CurveResult<Option<f64>> {
        Ok(match quote_type {
            QuoteType::Yield => Some(-1.0),
            _ => Some(0.0),
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

    #[test]
    fn test_price_yield_inverse() {
        let price = BondPriceHandler::price_from_yield(0.04, 3.0).unwrap();
        assert_relative_eq!(price, 100.0 / 1.04f64.powi(3), epsilon = 1e-12);
        let y = BondPriceHandler::yield_from_price(price, 3.0).unwrap();
        assert_relative_eq!(y, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_domain_errors() {
        assert!(BondPriceHandler::price_from_yield(-1.0, 2.0).is_err());
        assert!(BondPriceHandler::yield_from_price(0.0, 2.0).is_err());
    }
}
