use super::{check_native, price_in_pricing_convention, product_as, QuoteHandler, QuoteType};
use crate::bump::BumpUnit;
use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::product::Pricer;
use crate::products::FxForward;
use crate::tenor::Tenor;

/// Size of one pip for a pair trading at `spot`.
///
/// Four decimal places below the leading digit: `1e-4` for EURUSD at 1.10,
/// `1e-2` for USDJPY at 150.
pub fn pip_size(spot: f64) -> f64 {
    10f64.powf(spot.abs().log10().floor() - 4.0)
}

/// FX outrights and forward points.
///
/// `outright = spot + points * pip`. Relative bumps are measured in pips.
#[derive(Debug, Clone, Copy, Default)]
pub struct FxQuoteHandler;

impl QuoteHandler for FxQuoteHandler {
    fn name(&self) -> &'static str {
        "FxQuote"
    }

    fn native_types(&self) -> &'static [QuoteType] {
        &[QuoteType::FxRate, QuoteType::ForwardPoints]
    }

    fn convert(&self, tenor: &Tenor, value: f64, from: QuoteType, to: QuoteType) -> CurveResult<f64> {
        check_native(self, from, to)?;
        if from == to {
            return Ok(value);
        }
        let forward = product_as::<FxForward>(self.name(), tenor)?;
        let (spot, pip) = (forward.spot(), forward.pip());
        Ok(match to {
            QuoteType::ForwardPoints => (value - spot) / pip,
            _ => spot + value * pip,
        })
    }

    fn bump_unit(&self, tenor: &Tenor) -> CurveResult<BumpUnit> {
        Ok(match tenor.quote().quote_type {
            QuoteType::ForwardPoints => BumpUnit::Pip(1.0),
            _ => BumpUnit::Pip(product_as::<FxForward>(self.name(), tenor)?.pip()),
        })
    }

    fn lower_bound(&self, tenor: &Tenor, quote_type: QuoteType) -> CurveResult<Option<f64>> {
        Ok(match quote_type {
            QuoteType::ForwardPoints => {
                let forward = product_as::<FxForward>(self.name(), tenor)?;
                Some(-forward.spot() / forward.pip())
            }
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
    fn test_pip_size() {
        assert_relative_eq!(pip_size(1.0950), 1e-4, epsilon = 1e-18);
        assert_relative_eq!(pip_size(151.3), 1e-2, epsilon = 1e-16);
        assert_relative_eq!(pip_size(0.0064), 1e-7, epsilon = 1e-20);
    }
}
