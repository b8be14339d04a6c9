use super::{check_native, price_in_pricing_convention, QuoteHandler, QuoteType};
use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::product::Pricer;
use crate::tenor::Tenor;

/// Rates and coupons quoted at par.
///
/// A par swap's fixed coupon equals its par rate, so conversion between
/// the two conventions is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParRateHandler;

impl QuoteHandler for ParRateHandler {
    fn name(&self) -> &'static str {
        "ParRate"
    }

    fn native_types(&self) -> &'static [QuoteType] {
        &[QuoteType::Rate, QuoteType::Coupon]
    }

    fn convert(&self, _tenor: &Tenor, value: f64, from: QuoteType, to: QuoteType) -> CurveResult<f64> {
        check_native(self, from, to)?;
        Ok(value)
    }

    fn create_pricer(&self, tenor: &Tenor, calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        price_in_pricing_convention(self, tenor, calibrator)
    }
}
