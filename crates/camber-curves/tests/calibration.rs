//! Calibration, refit and quote conversion across curve kinds.

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use camber_core::Currency;
use camber_curves::prelude::*;
use camber_math::solvers::SolverConfig;
use common::{as_of, credit_curve, fitted_rate_handle, months, rate_curve, usd_sofr, years};
use proptest::prelude::*;

const QUOTES: [(&str, f64); 5] = [("1M", 0.0430), ("3M", 0.0432), ("6M", 0.0425), ("2Y", 0.0395), ("5Y", 0.0380)];

#[test]
fn test_bootstrap_reprices_every_tenor() {
    let handle = usd_sofr();
    let curve = handle.read();
    assert_eq!(curve.state(), FitState::Fitted);
    for (i, (_, rate)) in QUOTES.iter().enumerate() {
        assert_relative_eq!(curve.implied_quote(i).unwrap(), *rate, epsilon = 1e-8);
    }
    assert!(curve.repricing_errors().unwrap().iter().all(|e| e.abs() < 1e-9));

    let df = curve.discount_factor(years(1)).unwrap();
    assert!(df > 0.95 && df < 0.97);
    let zero = curve.zero_rate(years(1)).unwrap();
    assert!(zero > 0.035 && zero < 0.045);
    assert!(curve.forward_rate(years(1), years(2)).unwrap() > 0.0);
}

#[test]
fn test_bootstrap_bisects_when_brent_stalls() {
    let mut curve = rate_curve("USD-SOFR", &QUOTES);
    let starved = BootstrapCalibrator::new(as_of(), as_of()).with_solver(SolverConfig::new(1e-13, 2));
    curve.set_calibrator(Arc::new(starved));
    curve.fit().unwrap();
    for (i, (_, rate)) in QUOTES.iter().enumerate() {
        assert_relative_eq!(curve.implied_quote(i).unwrap(), *rate, epsilon = 1e-8);
    }
}

#[test]
fn test_refit_is_deterministic() {
    let mut first = rate_curve("USD-SOFR", &QUOTES);
    let mut second = rate_curve("USD-SOFR", &QUOTES);
    first.fit().unwrap();
    second.fit().unwrap();
    assert_eq!(first.curve().values(), second.curve().values());

    let points = first.curve().values().to_vec();
    first.fit().unwrap();
    assert_eq!(first.curve().values(), points.as_slice());
}

#[test]
fn test_partial_refit_matches_full_fit() {
    let handle = usd_sofr();
    {
        let mut curve = handle.write();
        curve.tenors_mut().get_mut(3).unwrap().set_quote(Quote::rate(0.0410)).unwrap();
        curve.refit(3).unwrap();
        assert_eq!(curve.state(), FitState::PartiallyFitted { from: 3 });
    }

    let mut bumped = QUOTES;
    bumped[3].1 = 0.0410;
    let mut fresh = rate_curve("USD-SOFR", &bumped);
    fresh.fit().unwrap();

    assert_eq!(handle.read().curve().values(), fresh.curve().values());
}

#[test]
fn test_refit_requires_prior_fit() {
    let mut curve = rate_curve("USD-SOFR", &QUOTES);
    assert!(matches!(curve.refit(2), Err(CurveError::NotFitted { .. })));
    assert!(matches!(curve.value(years(1)), Err(CurveError::NotFitted { .. })));
    assert!(curve.refit(0).is_ok());
}

#[test]
fn test_frozen_curve_refuses_fit() {
    let handle = usd_sofr();
    let mut curve = handle.write();
    curve.set_frozen(true);
    assert!(matches!(curve.fit(), Err(CurveError::Domain { .. })));
    assert!(curve.is_fitted());
}

#[test]
fn test_curve_from_conventions() {
    let conventions = CurveConventions::standard();
    let builder = CurveBuilder::from_conventions("usd-sofr", as_of(), &conventions).unwrap();
    assert_eq!(builder.settle(), as_of().add_days(2));

    let settle = builder.settle();
    let mut curve = builder
        .deposit("3M", 0.043)
        .unwrap()
        .swap("2Y", 0.0395, 12)
        .unwrap()
        .build(
            Arc::new(BootstrapCalibrator::new(as_of(), settle)),
            Arc::new(DiscountInterpolator),
        )
        .unwrap();
    curve.fit().unwrap();
    assert_relative_eq!(curve.implied_quote(1).unwrap(), 0.0395, epsilon = 1e-8);

    assert!(CurveBuilder::from_conventions("XXX-NONE", as_of(), &conventions).is_err());
}

#[test]
fn test_direct_calibrator_stores_quotes() {
    let handler: Arc<dyn QuoteHandler> = Arc::new(CommodityPriceHandler);
    let convention = TermConvention::new(Currency::USD, QuoteType::Price).with_settlement_days(0);
    let mut builder = CurveBuilder::new("BRENT-QUOTED", as_of(), convention);
    for (m, price) in [(3, 81.0), (6, 82.5), (12, 84.0)] {
        let forward = CommodityForward::new(as_of(), months(m), Currency::USD, price).unwrap();
        builder = builder
            .product(format!("{m}M"), Arc::new(forward), Quote::price(price), Arc::clone(&handler))
            .unwrap();
    }
    let mut curve = builder
        .build(
            Arc::new(DirectCalibrator::new(as_of(), as_of())),
            Arc::new(ValueInterpolator),
        )
        .unwrap();
    curve.fit().unwrap();

    assert_eq!(curve.curve().len(), 3);
    assert_eq!(curve.curve().point_at(months(6)), Some(82.5));
    assert_relative_eq!(curve.value(months(6)).unwrap(), 82.5, max_relative = 1e-12);
    let mid = curve.value(months(9)).unwrap();
    assert!(mid > 82.5 && mid < 84.0);
}

fn zero_bond_tenor(name: &str, maturity_years: i32, price: f64) -> Tenor {
    let bond = ZeroBond::new(as_of(), years(maturity_years), Currency::USD).unwrap();
    Tenor::new(name, Arc::new(bond), Quote::price(price), Arc::new(BondPriceHandler)).unwrap()
}

#[test]
fn test_bond_price_yield_round_trip() {
    let mut tenor = zero_bond_tenor("2Y", 2, 92.0);
    let y = tenor.quote_as(QuoteType::Yield).unwrap();
    assert!(y > 0.04 && y < 0.045);

    tenor.set_quote(Quote::new(y, QuoteType::Yield)).unwrap();
    assert_eq!(tenor.quote().quote_type, QuoteType::Price);
    assert_relative_eq!(tenor.quote().value, 92.0, max_relative = 1e-12);
}

#[test]
fn test_bond_price_bump_clamps_at_zero() {
    let mut tenor = zero_bond_tenor("1Y", 1, 96.0);
    let realized = tenor.bump(200.0, BumpFlags::absolute().down()).unwrap();
    assert_relative_eq!(realized, -48.0, epsilon = 1e-12);
    assert_relative_eq!(tenor.quote().value, 48.0, epsilon = 1e-12);
    assert!(tenor.is_bumped());
}

#[test]
fn test_cds_spread_upfront_round_trip() {
    let cds = Cds::new(as_of(), years(5), Currency::USD, 0.01, 0.4).unwrap();
    let mut tenor = Tenor::new("5Y", Arc::new(cds), Quote::spread(0.02), Arc::new(CdsQuoteHandler::new(0.04))).unwrap();

    let upfront = tenor.quote_as(QuoteType::UpfrontFee).unwrap();
    assert!(upfront > 0.0);
    tenor.set_quote(Quote::new(upfront, QuoteType::UpfrontFee)).unwrap();
    assert_eq!(tenor.quote().quote_type, QuoteType::Spread);
    assert_relative_eq!(tenor.quote().value, 0.02, epsilon = 1e-10);
}

#[test]
fn test_fx_outright_points_round_trip() {
    let forward = FxForward::new(as_of(), years(1), Currency::USD, 1.1050, 1.1110).unwrap();
    let mut tenor = Tenor::new("1Y", Arc::new(forward), Quote::new(1.1110, QuoteType::FxRate), Arc::new(FxQuoteHandler)).unwrap();

    assert_relative_eq!(tenor.quote_as(QuoteType::ForwardPoints).unwrap(), 60.0, epsilon = 1e-8);
    tenor.set_quote(Quote::new(75.0, QuoteType::ForwardPoints)).unwrap();
    assert_relative_eq!(tenor.quote().value, 1.1125, epsilon = 1e-12);
}

#[test]
fn test_unsupported_conversion() {
    let handle = usd_sofr();
    let curve = handle.read();
    let err = curve.tenors().get(0).unwrap().quote_as(QuoteType::Price).unwrap_err();
    assert!(matches!(err, CurveError::QuoteConversionNotSupported { .. }));
}

#[test]
fn test_survival_curve_calibration() {
    let discount = usd_sofr();
    let credit = CurveHandle::new(credit_curve("ACME", &discount, &[(1, 0.01), (3, 0.015), (5, 0.02)]));
    credit.write().fit().unwrap();

    let curve = credit.read();
    assert_eq!(curve.kind(), CurveKind::Survival);
    let q: Vec<f64> = [1, 3, 5]
        .iter()
        .map(|y| curve.survival_probability(years(*y)).unwrap())
        .collect();
    assert!(q.windows(2).all(|w| w[1] < w[0]));
    assert!(q[0] > 0.97 && q[0] < 1.0);
    for (i, spread) in [0.01, 0.015, 0.02].iter().enumerate() {
        assert_relative_eq!(curve.implied_quote(i).unwrap(), *spread, epsilon = 1e-8);
    }
    assert!(matches!(curve.discount_factor(years(1)), Err(CurveError::Domain { .. })));
}

#[test]
fn test_isolated_failures_are_wrapped() {
    let deposits = fitted_rate_handle("USD-OIS", &[("1M", 0.01), ("3M", 0.012)]);

    let convention = TermConvention::new(Currency::USD, QuoteType::Price).with_settlement_days(0);
    let bonds = CurveBuilder::new("UST-STRIPS", as_of(), convention)
        .tenor(zero_bond_tenor("1Y", 1, 96.0))
        .tenor(zero_bond_tenor("2Y", 2, 92.0))
        .build(
            Arc::new(BootstrapCalibrator::new(as_of(), as_of())),
            Arc::new(DiscountInterpolator),
        )
        .unwrap();
    let bonds = CurveHandle::new(bonds);
    bonds.write().fit().unwrap();

    // a price pushed below zero has no positive discount factor
    let spec = BumpSpec::tenors(["3M", "2Y"], vec![0.0001, -200.0]).allow_cross_zero();
    let curves = [deposits.clone(), bonds.clone()];
    let results = bump_curves_isolated(&curves, &spec, &EngineConfig::sequential()).unwrap();

    assert_relative_eq!(*results[0].as_ref().unwrap(), 0.0001, epsilon = 1e-15);
    match &results[1] {
        Err(CurveError::CurveCalibration {
            curve_index,
            curve_name,
            tenor,
            ..
        }) => {
            assert_eq!(*curve_index, 1);
            assert_eq!(curve_name, "UST-STRIPS");
            assert_eq!(tenor, "2Y");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(deposits.read().is_fitted());
    assert!(!bonds.read().is_fitted());

    reset_quotes(&curves[..1]).unwrap();
    let err = bump_curves(&curves, &spec, &EngineConfig::sequential()).unwrap_err();
    assert!(err.is_calibration_failure());
}

fn curve_set(shift: f64) -> Vec<CurveHandle> {
    (0..6)
        .map(|i| {
            let base = 0.03 + 0.002 * f64::from(i) + shift;
            fitted_rate_handle(
                &format!("CURVE-{i}"),
                &[("1M", base), ("6M", base + 0.001), ("2Y", base + 0.002), ("5Y", base + 0.0025)],
            )
        })
        .collect()
}

#[test]
fn test_parallel_matches_sequential() {
    let parallel_curves = curve_set(0.0);
    let sequential_curves = curve_set(0.0);
    let spec = BumpSpec::tenors(["6M", "5Y"], vec![0.001, -0.0005]).with_weights(vec![1.0, 2.0, 0.5, 1.0, 1.0, 3.0]);

    let a = bump_curves(&parallel_curves, &spec, &EngineConfig::default().with_threshold(0)).unwrap();
    let b = bump_curves(&sequential_curves, &spec, &EngineConfig::sequential()).unwrap();
    assert_eq!(a, b);
    for (p, s) in parallel_curves.iter().zip(&sequential_curves) {
        assert_eq!(p.read().curve().values(), s.read().curve().values());
    }
}

fn deposit_tenor(m: i32) -> Tenor {
    let deposit = Deposit::new(as_of(), months(m), Currency::USD).unwrap();
    Tenor::new(format!("{m}M"), Arc::new(deposit), Quote::rate(0.01), Arc::new(ParRateHandler)).unwrap()
}

proptest! {
    #[test]
    fn prop_sort_orders_by_maturity(offsets in prop::collection::hash_set(1i32..240, 1..20)) {
        let mut set = TenorSet::new();
        for m in &offsets {
            set.add(deposit_tenor(*m)).unwrap();
        }
        set.sort();
        prop_assert!(set.is_sorted());
        prop_assert_eq!(set.len(), offsets.len());
        prop_assert!(set.iter().zip(set.iter().skip(1)).all(|(a, b)| a.maturity() < b.maturity()));
        for (i, tenor) in set.iter().enumerate() {
            prop_assert_eq!(set.binary_search(tenor.maturity()), Ok(i));
        }
    }
}
