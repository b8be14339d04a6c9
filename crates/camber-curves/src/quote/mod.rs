//! Market quotes and quote-convention handlers.
//!
//! A tenor stores its quote in one native convention. Its [`QuoteHandler`]
//! converts to and from the other conventions it supports, applies bumps
//! with the shared algorithm in [`crate::bump::apply_bump`], and builds the
//! pricer calibration uses.
//!
//! | Handler | Native conventions | Relative bump unit | Boundary |
//! |---------|--------------------|--------------------|----------|
//! | [`ParRateHandler`] | Rate, Coupon | quote | none |
//! | [`BondPriceHandler`] | Price, Yield | quote | price 0, yield -1 |
//! | [`CdsQuoteHandler`] | Spread, UpfrontFee | quote | spread 0 |
//! | [`FxQuoteHandler`] | FxRate, ForwardPoints | pip | outright 0 |
//! | [`CommodityPriceHandler`] | Price | quote | price 0 |

mod bond;
mod cds;
mod commodity;
mod fx;
mod par_rate;

pub use bond::BondPriceHandler;
pub use cds::CdsQuoteHandler;
pub use commodity::CommodityPriceHandler;
pub use fx::{pip_size, FxQuoteHandler};
pub use par_rate::ParRateHandler;

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::bump::{apply_bump, BumpFlags, BumpUnit};
use crate::calibrator::Calibrator;
use crate::error::{CurveError, CurveResult};
use crate::product::Pricer;
use crate::tenor::Tenor;

/// Market quoting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteType {
    /// Money-market or par swap rate.
    Rate,
    /// Credit spread.
    Spread,
    /// Price per 100 (bonds) or per unit (commodities).
    Price,
    /// Annually compounded yield.
    Yield,
    /// Upfront fee as a fraction of notional.
    UpfrontFee,
    /// FX outright rate.
    FxRate,
    /// FX forward points in pips.
    ForwardPoints,
    /// Fixed leg coupon.
    Coupon,
}

impl fmt::Display for QuoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuoteType::Rate => "Rate",
            QuoteType::Spread => "Spread",
            QuoteType::Price => "Price",
            QuoteType::Yield => "Yield",
            QuoteType::UpfrontFee => "UpfrontFee",
            QuoteType::FxRate => "FxRate",
            QuoteType::ForwardPoints => "ForwardPoints",
            QuoteType::Coupon => "Coupon",
        };
        f.write_str(name)
    }
}

impl FromStr for QuoteType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rate" => Ok(QuoteType::Rate),
            "spread" => Ok(QuoteType::Spread),
            "price" => Ok(QuoteType::Price),
            "yield" => Ok(QuoteType::Yield),
            "upfront" | "upfrontfee" => Ok(QuoteType::UpfrontFee),
            "fxrate" | "outright" => Ok(QuoteType::FxRate),
            "forwardpoints" | "points" => Ok(QuoteType::ForwardPoints),
            "coupon" => Ok(QuoteType::Coupon),
            _ => Err(CurveError::validation(format!("unknown quote type '{s}'"))),
        }
    }
}

/// A quote value with its convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote value.
    pub value: f64,
    /// Quoting convention.
    pub quote_type: QuoteType,
}

impl Quote {
    /// Creates a quote.
    #[must_use]
    pub fn new(value: f64, quote_type: QuoteType) -> Self {
        Self { value, quote_type }
    }

    /// A rate quote.
    #[must_use]
    pub fn rate(value: f64) -> Self {
        Self::new(value, QuoteType::Rate)
    }

    /// A price quote.
    #[must_use]
    pub fn price(value: f64) -> Self {
        Self::new(value, QuoteType::Price)
    }

    /// A spread quote.
    #[must_use]
    pub fn spread(value: f64) -> Self {
        Self::new(value, QuoteType::Spread)
    }
}

/// Converts, sets, bumps and prices a tenor's quote.
///
/// Handlers are stateless or carry only convention parameters, so one
/// instance is shared across many tenors.
pub trait QuoteHandler: Send + Sync + fmt::Debug {
    /// Handler name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Conventions this handler can read and write.
    fn native_types(&self) -> &'static [QuoteType];

    /// Returns true if `quote_type` is a native convention.
    fn supports(&self, quote_type: QuoteType) -> bool {
        self.native_types().contains(&quote_type)
    }

    /// Converts `value` from one native convention to another for `tenor`.
    fn convert(&self, tenor: &Tenor, value: f64, from: QuoteType, to: QuoteType) -> CurveResult<f64>;

    /// Current quote in the tenor's own convention.
    fn quote(&self, tenor: &Tenor) -> Quote {
        tenor.quote()
    }

    /// Current quote expressed in `quote_type`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::QuoteConversionNotSupported` for a convention
    /// the handler does not implement.
    fn quote_as(&self, tenor: &Tenor, quote_type: QuoteType) -> CurveResult<f64> {
        let current = tenor.quote();
        self.convert(tenor, current.value, current.quote_type, quote_type)
    }

    /// Stores `quote`, converting it to the tenor's convention first.
    fn set_quote(&self, tenor: &mut Tenor, quote: Quote) -> CurveResult<()> {
        let native = tenor.quote().quote_type;
        let value = self.convert(tenor, quote.value, quote.quote_type, native)?;
        tenor.store_quote(Quote::new(value, native))
    }

    /// Unit used for relative bumps.
    fn bump_unit(&self, _tenor: &Tenor) -> CurveResult<BumpUnit> {
        Ok(BumpUnit::Proportional)
    }

    /// Value the quote may not reach when bumped down.
    fn lower_bound(&self, _tenor: &Tenor, _quote_type: QuoteType) -> CurveResult<Option<f64>> {
        Ok(None)
    }

    /// Bumps the quote and returns the signed, normalized realized bump.
    fn bump(&self, tenor: &mut Tenor, size: f64, flags: BumpFlags) -> CurveResult<f64> {
        let current = tenor.quote();
        let unit = self.bump_unit(tenor)?;
        let bound = self.lower_bound(tenor, current.quote_type)?;
        let outcome = apply_bump(current.value, size, flags, unit, bound)?;
        if outcome.clamped {
            warn!(
                "{}: bump of {size} on tenor '{}' clamped at boundary, quote {} -> {}",
                self.name(),
                tenor.name(),
                current.value,
                outcome.value
            );
        }
        tenor.store_quote(Quote::new(outcome.value, current.quote_type))?;
        Ok(outcome.realized)
    }

    /// Builds the pricer calibration uses for `tenor`.
    fn create_pricer(&self, tenor: &Tenor, calibrator: &dyn Calibrator) -> CurveResult<Box<dyn Pricer>>;
}

/// Fails unless both conventions are native to `handler`.
pub(crate) fn check_native<H: QuoteHandler + ?Sized>(
    handler: &H,
    from: QuoteType,
    to: QuoteType,
) -> CurveResult<()> {
    for quote_type in [from, to] {
        if !handler.supports(quote_type) {
            return Err(CurveError::conversion_not_supported(
                handler.name(),
                quote_type.to_string(),
            ));
        }
    }
    Ok(())
}

/// Builds the product's pricer from the tenor quote expressed in the
/// product's pricing convention.
pub(crate) fn price_in_pricing_convention<H: QuoteHandler + ?Sized>(
    handler: &H,
    tenor: &Tenor,
    calibrator: &dyn Calibrator,
) -> CurveResult<Box<dyn Pricer>> {
    let quote_type = tenor.product().pricing_quote_type();
    let value = handler.quote_as(tenor, quote_type)?;
    tenor
        .product()
        .create_pricer(&Quote::new(value, quote_type), calibrator)
}

/// Downcasts the tenor's product to the type a handler needs.
pub(crate) fn product_as<'t, P: 'static>(handler: &str, tenor: &'t Tenor) -> CurveResult<&'t P> {
    tenor
        .product()
        .as_any()
        .downcast_ref::<P>()
        .ok_or_else(|| {
            CurveError::domain(format!(
                "{handler} handler cannot quote product {} on tenor '{}'",
                tenor.product().name(),
                tenor.name()
            ))
        })
}
