//! # Camber Curves
//!
//! Curve calibration and bump/refit sensitivity for the Camber framework.
//!
//! This crate provides:
//!
//! - **Curve**: dated points with interpolation and extrapolation rules
//! - **Interpolators**: curve-kind strategies (discount, survival, commodity,
//!   FX parity and triangulation, inflation, plain values)
//! - **Quote handlers**: native quote conventions, conversion and bumping
//! - **Tenors**: calibration instruments and their ordered container
//! - **Calibrators**: sequential bootstrap and direct calibration
//! - **Calibrated curves**: one composed type for every kind, with
//!   internal storage targets and dependency discovery
//! - **Bump engine**: parallel bump/refit campaigns, hedge PVs and tenor
//!   queries across curve sets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use camber_curves::prelude::*;
//!
//! let conventions = CurveConventions::standard();
//! let builder = CurveBuilder::from_conventions("USD-SOFR", as_of, &conventions)?;
//! let settle = builder.settle();
//! let sofr = builder
//!     .deposit("1M", 0.0430)?
//!     .deposit("3M", 0.0432)?
//!     .swap("2Y", 0.0395, 12)?
//!     .build(
//!         Arc::new(BootstrapCalibrator::new(as_of, settle)),
//!         Arc::new(DiscountInterpolator),
//!     )?;
//!
//! let sofr = CurveHandle::new(sofr);
//! fit_all(&[sofr.clone()])?;
//!
//! // 1bp on the 3M deposit, refit from that tenor on
//! let realized = bump_curves(&[sofr.clone()], &BumpSpec::tenor("3M", 0.0001), &EngineConfig::default())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]

pub mod builder;
pub mod bump;
pub mod calibrated;
pub mod calibrator;
pub mod config;
pub mod curve;
pub mod dependency;
pub mod error;
pub mod handle;
pub mod interpolator;
pub mod parallel;
pub mod product;
pub mod products;
pub mod quote;
pub mod tenor;
pub mod tenor_set;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::CurveBuilder;
    pub use crate::bump::{
        bump_curves, bump_curves_isolated, closest_tenor, commit_quotes, hedge_curves,
        reset_quotes, unique_tenor_names, BumpFlags, BumpSpec, ClosestTenor, HedgeTarget,
    };
    pub use crate::calibrated::{CalibratedCurve, FitState, StorageTarget};
    pub use crate::calibrator::{BootstrapCalibrator, Calibrator, DirectCalibrator, FitContext};
    pub use crate::config::{CurveConventions, EngineConfig, TermConvention};
    pub use crate::curve::Curve;
    pub use crate::dependency::{fit_all, fit_order};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::handle::{CurveHandle, CurveId};
    pub use crate::interpolator::{
        CommodityInterpolator, CurveInterpolator, CurveKind, CurveView, DiscountInterpolator,
        FxParityInterpolator, FxTriangulatedInterpolator, InflationInterpolator,
        SurvivalInterpolator, TriangulationLeg, ValueInterpolator,
    };
    pub use crate::product::{Pricer, Product};
    pub use crate::products::{
        Cds, CommodityForward, Deposit, FxForward, InflationSwap, Swap, ZeroBond,
    };
    pub use crate::quote::{
        BondPriceHandler, CdsQuoteHandler, CommodityPriceHandler, FxQuoteHandler, ParRateHandler,
        Quote, QuoteHandler, QuoteType,
    };
    pub use crate::tenor::Tenor;
    pub use crate::tenor_set::TenorSet;
}

pub use calibrated::CalibratedCurve;
pub use curve::Curve;
pub use error::{CurveError, CurveResult};
pub use handle::CurveHandle;
pub use tenor::Tenor;
pub use tenor_set::TenorSet;
