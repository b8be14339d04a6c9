//! Parent and child curves: live dependencies, ordering and cycles.

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use camber_curves::prelude::*;
use common::{as_of, commodity_curve, months, rate_curve, usd_sofr};

#[test]
fn test_child_sees_parent_refit_without_own_refit() {
    let discount = usd_sofr();
    let brent = CurveHandle::new(commodity_curve("BRENT", 80.0, &discount, &[(6, 82.0), (12, 84.0)]));
    brent.write().fit().unwrap();

    let date = months(9);
    let forward_before = brent.read().forward(date).unwrap();
    let df_before = discount.read().discount_factor(date).unwrap();
    let lease_points: Vec<f64> = brent.read().target().values().to_vec();

    bump_curves(&[discount.clone()], &BumpSpec::all(0.001), &EngineConfig::default()).unwrap();

    let df_after = discount.read().discount_factor(date).unwrap();
    let forward_after = brent.read().forward(date).unwrap();
    assert!(df_after < df_before);
    assert_relative_eq!(forward_after, forward_before * df_before / df_after, max_relative = 1e-12);
    assert_eq!(brent.read().target().values(), lease_points.as_slice());

    let curve = brent.read();
    for (date, value) in curve.public_points().unwrap() {
        assert_relative_eq!(value, curve.forward(date).unwrap(), max_relative = 1e-14);
    }
    let (_, twelve) = curve.public_points().unwrap().into_iter().find(|(d, _)| *d == months(12)).unwrap();
    assert!(twelve > 84.0);
}

#[test]
fn test_commodity_fit_reprices_forwards() {
    let discount = usd_sofr();
    let brent = CurveHandle::new(commodity_curve("BRENT", 80.0, &discount, &[(6, 82.0), (12, 84.0)]));
    brent.write().fit().unwrap();

    let curve = brent.read();
    assert!(matches!(curve.storage(), StorageTarget::Internal(_)));
    assert_relative_eq!(curve.forward(months(6)).unwrap(), 82.0, epsilon = 1e-8);
    assert_relative_eq!(curve.forward(months(12)).unwrap(), 84.0, epsilon = 1e-8);
    assert_relative_eq!(curve.forward(as_of()).unwrap(), 80.0, epsilon = 1e-12);
    assert!(curve.curve().is_empty());
    let points = curve.public_points().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].0, as_of());
    assert_relative_eq!(points[2].1, 84.0, epsilon = 1e-8);
    assert!(curve.repricing_errors().unwrap().iter().all(|e| e.abs() < 1e-8));
}

#[test]
fn test_child_requires_fitted_parent() {
    let discount = CurveHandle::new(rate_curve("USD-OIS", &[("1M", 0.01), ("3M", 0.012)]));
    let brent = CurveHandle::new(commodity_curve("BRENT", 80.0, &discount, &[(6, 82.0)]));

    let err = brent.write().fit().unwrap_err();
    assert!(matches!(err, CurveError::ParentNotFitted { .. }));
    assert!(!brent.read().is_fitted());
}

#[test]
fn test_fit_order_puts_parents_first() {
    let discount = CurveHandle::new(rate_curve("USD-OIS", &[("1M", 0.01), ("3M", 0.012)]));
    let brent = CurveHandle::new(commodity_curve("BRENT", 80.0, &discount, &[(6, 82.0)]));

    let order = fit_order(&[brent.clone()]).unwrap();
    let names: Vec<&str> = order.iter().map(CurveHandle::name).collect();
    assert_eq!(names, ["USD-OIS", "BRENT"]);

    let order = fit_order(&[brent.clone(), discount.clone()]).unwrap();
    assert_eq!(order.len(), 2);
    assert!(order[0].same_curve(&discount));
}

#[test]
fn test_fit_all_fits_unfitted_parents() {
    let discount = CurveHandle::new(rate_curve("USD-OIS", &[("1M", 0.01), ("3M", 0.012)]));
    let brent = CurveHandle::new(commodity_curve("BRENT", 80.0, &discount, &[(6, 82.0)]));

    fit_all(&[brent.clone()]).unwrap();
    assert!(discount.read().is_fitted());
    assert!(brent.read().is_fitted());
}

#[test]
fn test_enumerate_parents() {
    let discount = usd_sofr();
    let brent = CurveHandle::new(commodity_curve("BRENT", 80.0, &discount, &[(6, 82.0)]));
    let curve = brent.read();

    let direct = curve.enumerate_parents(false).unwrap();
    assert_eq!(direct.len(), 1);
    assert!(direct[0].same_curve(&discount));
    assert!(discount.read().enumerate_parents(true).unwrap().is_empty());
}

fn cyclic_pair() -> (CurveHandle, CurveHandle) {
    let discount = usd_sofr();
    let brent = CurveHandle::new(commodity_curve("BRENT", 80.0, &discount, &[(6, 82.0)]));
    brent.write().fit().unwrap();
    discount
        .write()
        .set_calibrator(Arc::new(BootstrapCalibrator::new(as_of(), as_of()).with_parent(brent.clone())));
    (discount, brent)
}

#[test]
fn test_cycle_detected_by_fit_order() {
    let (discount, brent) = cyclic_pair();
    let err = fit_order(&[discount, brent]).unwrap_err();
    match err {
        CurveError::DependencyCycle { path } => {
            assert!(path.contains("USD-SOFR"));
            assert!(path.contains("BRENT"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_cycle_detected_on_fit() {
    let (discount, _brent) = cyclic_pair();
    let err = discount.write().fit().unwrap_err();
    assert!(matches!(err, CurveError::DependencyCycle { .. }));
}

#[test]
fn test_cycle_rejected_before_bumping() {
    let (discount, brent) = cyclic_pair();
    let err = bump_curves(&[discount.clone(), brent], &BumpSpec::all(0.001), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, CurveError::DependencyCycle { .. }));
    assert!(discount.read().tenors().iter().all(|t| !t.is_bumped()));
}
