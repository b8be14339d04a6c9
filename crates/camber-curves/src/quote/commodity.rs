use super::{check_native, price_in_pricing_convention, QuoteHandler, QuoteType};
use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::product::Pricer;
use crate::tenor::Tenor;

/// Commodity forward prices.
///
/// Storing a quote refreshes the forward's delivery price through
/// [`crate::product::Product::sync_quote`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommodityPriceHandler;

impl QuoteHandler for CommodityPriceHandler {
    fn name(&self) -> &'static str {
        "CommodityPrice"
    }

    fn native_types(&self) -> &'static [QuoteType] {
        &[QuoteType::Price]
    }

    fn convert(&self, _tenor: &Tenor, value: f64, from: QuoteType, to: QuoteType) -> CurveResult<f64> {
        check_native(self, from, to)?;
        Ok(value)
    }

    fn lower_bound(&self, _tenor: &Tenor, _quote_type: QuoteType) -> CurveResult<Option<f64>> {
        Ok(Some(0.0))
    }

    fn create_pricer(&self, tenor: &Tenor, calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>> {
        price_in_pricing_convention(self, tenor, calibrator)
    }
}
