//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use camber_core::{Currency, Date};
use camber_curves::prelude::*;

pub fn as_of() -> Date {
    Date::from_ymd(2025, 1, 2).unwrap()
}

pub fn months(n: i32) -> Date {
    as_of().add_months(n).unwrap()
}

pub fn years(n: i32) -> Date {
    as_of().add_years(n).unwrap()
}

fn spot_convention() -> TermConvention {
    TermConvention::new(Currency::USD, QuoteType::Rate).with_settlement_days(0)
}

/// Unfitted discount curve of deposits (periods up to 1Y) and annual swaps.
pub fn rate_curve(name: &str, quotes: &[(&str, f64)]) -> CalibratedCurve {
    let mut builder = CurveBuilder::new(name, as_of(), spot_convention());
    for (period, rate) in quotes {
        builder = if period.ends_with('M') {
            builder.deposit(period, *rate).unwrap()
        } else {
            builder.swap(period, *rate, 12).unwrap()
        };
    }
    builder
        .build(
            Arc::new(BootstrapCalibrator::new(as_of(), as_of())),
            Arc::new(DiscountInterpolator),
        )
        .unwrap()
}

/// Fitted discount curve behind a handle.
pub fn fitted_rate_handle(name: &str, quotes: &[(&str, f64)]) -> CurveHandle {
    let handle = CurveHandle::new(rate_curve(name, quotes));
    handle.write().fit().unwrap();
    handle
}

pub fn usd_sofr() -> CurveHandle {
    fitted_rate_handle(
        "USD-SOFR",
        &[("1M", 0.0430), ("3M", 0.0432), ("6M", 0.0425), ("2Y", 0.0395), ("5Y", 0.0380)],
    )
}

/// Unfitted commodity curve of forwards over `discount`.
pub fn commodity_curve(name: &str, spot: f64, discount: &CurveHandle, forwards: &[(i32, f64)]) -> CalibratedCurve {
    let handler: Arc<dyn QuoteHandler> = Arc::new(CommodityPriceHandler);
    let mut builder = CurveBuilder::new(name, as_of(), spot_convention());
    for (m, price) in forwards {
        let forward = CommodityForward::new(as_of(), months(*m), Currency::USD, *price).unwrap();
        builder = builder
            .product(format!("{m}M"), Arc::new(forward), Quote::price(*price), Arc::clone(&handler))
            .unwrap();
    }
    builder
        .build(
            Arc::new(BootstrapCalibrator::new(as_of(), as_of())),
            Arc::new(CommodityInterpolator::new(spot, discount.clone()).unwrap()),
        )
        .unwrap()
}

/// Unfitted survival curve of CDS quoted in running spread.
pub fn credit_curve(name: &str, discount: &CurveHandle, spreads: &[(i32, f64)]) -> CalibratedCurve {
    let handler: Arc<dyn QuoteHandler> = Arc::new(CdsQuoteHandler::new(0.04));
    let mut builder = CurveBuilder::new(name, as_of(), spot_convention());
    for (y, spread) in spreads {
        let cds = Cds::new(as_of(), years(*y), Currency::USD, 0.01, 0.4).unwrap();
        builder = builder
            .product(format!("{y}Y"), Arc::new(cds), Quote::spread(*spread), Arc::clone(&handler))
            .unwrap();
    }
    builder
        .build(
            Arc::new(BootstrapCalibrator::new(as_of(), as_of()).with_discount(discount.clone())),
            Arc::new(SurvivalInterpolator::new()),
        )
        .unwrap()
}
