//! Product and pricer contracts consumed by calibration.
//!
//! The framework knows products only through [`Product`]: a maturity, a
//! currency, the quote convention its pricer expects, and a way to build a
//! [`Pricer`]. Quote handlers may downcast through [`Product::as_any`] when a
//! conversion needs product terms (a CDS coupon, an FX spot).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use camber_core::{Currency, Date};

use crate::calibrator::Calibrator;
use crate::error::CurveResult;
use crate::interpolator::CurveView;
use crate::quote::{Quote, QuoteType};

/// Values one product against a curve.
pub trait Pricer: Send + Sync {
    /// Model present value under `curve`.
    fn pv(&self, curve: &CurveView<'_>) -> CurveResult<f64>;

    /// Present value the model must reproduce at calibration.
    fn market_pv(&self) -> f64 {
        0.0
    }

    /// Quote implied by `curve`, in the product's pricing convention.
    fn implied_quote(&self, curve: &CurveView<'_>) -> CurveResult<f64>;
}

/// A calibration instrument.
pub trait Product: Send + Sync + fmt::Debug {
    /// Product type name.
    fn name(&self) -> &'static str;

    /// Start of the product's life, usually the settlement date.
    fn start(&self) -> Date;

    /// Final maturity.
    fn maturity(&self) -> Date;

    /// Settlement currency.
    fn currency(&self) -> Currency;

    /// Year fraction from start to maturity.
    fn term(&self) -> f64;

    /// Quote convention expected by [`Product::create_pricer`].
    fn pricing_quote_type(&self) -> QuoteType;

    /// Builds a pricer for `quote`, which is in the pricing convention.
    fn create_pricer(&self, quote: &Quote, calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>>;

    /// Copy of the product with any quote mirror updated to `quote`.
    ///
    /// Returns `None` for products that keep no mirror.
    fn sync_quote(&self, _quote: &Quote) -> Option<Arc<dyn Product>> {
        None
    }

    /// Copy of the product maturing on `maturity`, if the product supports
    /// re-dating.
    fn with_maturity(&self, _maturity: Date) -> Option<Arc<dyn Product>> {
        None
    }

    /// Dynamic access to the concrete product.
    fn as_any(&self) -> &dyn Any;
}
