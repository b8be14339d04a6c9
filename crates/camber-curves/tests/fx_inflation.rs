//! FX parity, FX crosses and inflation curves over shared discount parents.

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use camber_core::{Currency, Date};
use camber_curves::prelude::*;
use common::{as_of, fitted_rate_handle, months, usd_sofr, years};

fn fx_curve(
    name: &str,
    spot: f64,
    base: &CurveHandle,
    quote: &CurveHandle,
    outrights: &[(i32, f64)],
) -> CurveHandle {
    let handler: Arc<dyn QuoteHandler> = Arc::new(FxQuoteHandler);
    let convention = TermConvention::new(Currency::USD, QuoteType::FxRate).with_settlement_days(0);
    let mut builder = CurveBuilder::new(name, as_of(), convention);
    for (m, outright) in outrights {
        let forward = FxForward::new(as_of(), months(*m), Currency::USD, spot, *outright).unwrap();
        builder = builder
            .product(format!("{m}M"), Arc::new(forward), Quote::new(*outright, QuoteType::FxRate), Arc::clone(&handler))
            .unwrap();
    }
    let curve = builder
        .build(
            Arc::new(BootstrapCalibrator::new(as_of(), as_of())),
            Arc::new(FxParityInterpolator::new(spot, base.clone(), quote.clone()).unwrap()),
        )
        .unwrap();
    let handle = CurveHandle::new(curve);
    handle.write().fit().unwrap();
    handle
}

fn eur_estr() -> CurveHandle {
    fitted_rate_handle("EUR-ESTR", &[("1M", 0.0265), ("6M", 0.0255), ("2Y", 0.0230)])
}

fn jpy_tona() -> CurveHandle {
    fitted_rate_handle("JPY-TONA", &[("1M", 0.0020), ("6M", 0.0025), ("2Y", 0.0040)])
}

#[test]
fn test_fx_parity_reprices_outrights() {
    let usd = usd_sofr();
    let eur = eur_estr();
    let eurusd = fx_curve("EURUSD", 1.10, &eur, &usd, &[(6, 1.1080), (12, 1.1150)]);

    let curve = eurusd.read();
    assert_eq!(curve.kind(), CurveKind::Fx);
    assert!(matches!(curve.storage(), StorageTarget::Internal(_)));
    assert_relative_eq!(curve.forward(as_of()).unwrap(), 1.10, epsilon = 1e-12);
    assert_relative_eq!(curve.forward(months(6)).unwrap(), 1.1080, epsilon = 1e-8);
    assert_relative_eq!(curve.forward(months(12)).unwrap(), 1.1150, epsilon = 1e-8);
    assert_relative_eq!(curve.implied_quote(1).unwrap(), 1.1150, epsilon = 1e-8);
}

#[test]
fn test_fx_pip_bump_round_trip() {
    let usd = usd_sofr();
    let eur = eur_estr();
    let eurusd = fx_curve("EURUSD", 1.10, &eur, &usd, &[(6, 1.1080), (12, 1.1150)]);
    let config = EngineConfig::default();

    let up = bump_curves(&[eurusd.clone()], &BumpSpec::tenor("6M", 5.0).relative(), &config).unwrap();
    assert_relative_eq!(up[0], 5.0, epsilon = 1e-8);
    assert_relative_eq!(eurusd.read().forward(months(6)).unwrap(), 1.1085, epsilon = 1e-8);

    let down = bump_curves(&[eurusd.clone()], &BumpSpec::tenor("6M", 5.0).relative().down(), &config).unwrap();
    assert_relative_eq!(down[0], -5.0, epsilon = 1e-8);
    let curve = eurusd.read();
    assert_relative_eq!(curve.tenors().get(0).unwrap().quote().value, 1.1080, epsilon = 1e-12);
    assert_relative_eq!(curve.forward(months(6)).unwrap(), 1.1080, epsilon = 1e-8);
}

#[test]
fn test_fx_parity_needs_distinct_curves() {
    let usd = usd_sofr();
    assert!(FxParityInterpolator::new(1.10, usd.clone(), usd.clone()).is_err());
    assert!(FxParityInterpolator::new(-1.0, usd, eur_estr()).is_err());
}

#[test]
fn test_cross_through_two_legs() {
    let usd = usd_sofr();
    let eur = eur_estr();
    let jpy = jpy_tona();
    let eurusd = fx_curve("EURUSD", 1.10, &eur, &usd, &[(6, 1.1080), (12, 1.1150)]);
    let usdjpy = fx_curve("USDJPY", 150.0, &usd, &jpy, &[(6, 147.0), (12, 144.5)]);

    let cross = FxTriangulatedInterpolator::new(
        TriangulationLeg::direct(eurusd.clone()),
        TriangulationLeg::direct(usdjpy.clone()),
    )
    .unwrap();
    let mut eurjpy = CalibratedCurve::new(
        "EURJPY",
        Curve::new(as_of()),
        Arc::new(DirectCalibrator::new(as_of(), as_of())),
        Arc::new(cross),
    );
    eurjpy.fit().unwrap();

    let date = months(9);
    let expected = eurusd.read().forward(date).unwrap() * usdjpy.read().forward(date).unwrap();
    assert_relative_eq!(eurjpy.forward(date).unwrap(), expected, max_relative = 1e-14);

    // legs and their discount curves, each once
    assert_eq!(eurjpy.enumerate_parents(false).unwrap().len(), 2);
    assert_eq!(eurjpy.enumerate_parents(true).unwrap().len(), 5);

    let eurjpy = CurveHandle::new(eurjpy);
    let order = fit_order(&[eurjpy.clone()]).unwrap();
    assert_eq!(order.len(), 6);
    assert!(order.last().unwrap().same_curve(&eurjpy));
    let position = |h: &CurveHandle| order.iter().position(|o| o.same_curve(h)).unwrap();
    assert!(position(&usd) < position(&eurusd));
    assert!(position(&jpy) < position(&usdjpy));
}

#[test]
fn test_inverted_leg() {
    let usd = usd_sofr();
    let eur = eur_estr();
    let jpy = jpy_tona();
    let eurusd = fx_curve("EURUSD", 1.10, &eur, &usd, &[(12, 1.1150)]);
    let usdjpy = fx_curve("USDJPY", 150.0, &usd, &jpy, &[(12, 144.5)]);

    let ratio = FxTriangulatedInterpolator::new(
        TriangulationLeg::direct(eurusd.clone()),
        TriangulationLeg::inverted(usdjpy.clone()),
    )
    .unwrap();
    let target = Curve::new(as_of());
    let value = ratio.value(&target, years(1)).unwrap();
    assert_relative_eq!(value, 1.1150 / 144.5, max_relative = 1e-8);

    assert!(FxTriangulatedInterpolator::new(
        TriangulationLeg::direct(eurusd.clone()),
        TriangulationLeg::inverted(eurusd),
    )
    .is_err());
}

fn cpi_curve(nominal: &CurveHandle, seasonality: Option<[f64; 12]>) -> CalibratedCurve {
    let handler: Arc<dyn QuoteHandler> = Arc::new(ParRateHandler);
    let convention = TermConvention::new(Currency::USD, QuoteType::Rate).with_settlement_days(0);
    let mut builder = CurveBuilder::new("USD-CPI", as_of(), convention);
    for (y, rate) in [(1, 0.025), (2, 0.026), (5, 0.0245)] {
        let swap = InflationSwap::new(as_of(), years(y), Currency::USD, 300.0).unwrap();
        builder = builder
            .product(format!("{y}Y"), Arc::new(swap), Quote::rate(rate), Arc::clone(&handler))
            .unwrap();
    }
    let mut interpolator = InflationInterpolator::new(300.0, as_of(), nominal.clone()).unwrap();
    if let Some(factors) = seasonality {
        interpolator = interpolator.with_seasonality(factors).unwrap();
    }
    let mut curve = builder
        .build(
            Arc::new(BootstrapCalibrator::new(as_of(), as_of())),
            Arc::new(interpolator),
        )
        .unwrap();
    curve.fit().unwrap();
    curve
}

#[test]
fn test_inflation_curve_reprices_swaps() {
    let usd = usd_sofr();
    let cpi = cpi_curve(&usd, None);

    assert_eq!(cpi.kind(), CurveKind::Inflation);
    assert_relative_eq!(cpi.forward(as_of()).unwrap(), 300.0, epsilon = 1e-10);
    assert_relative_eq!(cpi.forward(years(1)).unwrap(), 300.0 * 1.025, max_relative = 1e-9);
    for (i, rate) in [0.025, 0.026, 0.0245].iter().enumerate() {
        assert_relative_eq!(cpi.implied_quote(i).unwrap(), *rate, epsilon = 1e-8);
    }
}

#[test]
fn test_seasonality_scales_off_cycle_months() {
    let usd = usd_sofr();
    let mut factors = [1.0; 12];
    factors[6] = 1.01;
    let flat = cpi_curve(&usd, None);
    let seasonal = cpi_curve(&usd, Some(factors));

    // tenor dates fall in January, so both fits solve the same real curve
    assert_eq!(flat.target().values(), seasonal.target().values());

    let july = Date::from_ymd(2026, 7, 2).unwrap();
    let ratio = seasonal.forward(july).unwrap() / flat.forward(july).unwrap();
    assert_relative_eq!(ratio, 1.01, max_relative = 1e-12);
    assert_relative_eq!(seasonal.forward(years(2)).unwrap(), flat.forward(years(2)).unwrap(), max_relative = 1e-12);
}

#[test]
fn test_invalid_seasonality_rejected() {
    let usd = usd_sofr();
    let mut factors = [1.0; 12];
    factors[3] = 0.0;
    let interpolator = InflationInterpolator::new(300.0, as_of(), usd.clone()).unwrap();
    assert!(interpolator.with_seasonality(factors).is_err());
    assert!(InflationInterpolator::new(0.0, as_of(), usd).is_err());
}
