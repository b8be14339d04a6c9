//! Engine settings and curve term conventions.
//!
//! Conventions are an explicit map passed to whoever builds curves.
//! [`CurveConventions::standard`] supplies market defaults for tests and
//! demos; calibration code never looks conventions up on its own.

use std::collections::BTreeMap;

use camber_core::{Currency, Date, DayCountConvention};
use camber_math::interpolation::{ExtrapolationMethod, InterpolationMethod};
use camber_math::solvers::SolverConfig;
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::quote::QuoteType;

// =============================================================================
// ENGINE CONFIGURATION
// =============================================================================

/// Settings for fitting and bump campaigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable parallel per-curve loops (requires the `parallel` feature).
    pub parallel: bool,

    /// Curve count above which a bump campaign runs in parallel.
    pub parallel_threshold: usize,

    /// Root finder tolerance for bootstrapping.
    pub solver_tolerance: f64,

    /// Root finder iteration cap.
    pub max_iterations: u32,

    /// Bracket expansion rounds before a tenor is declared unsolvable.
    pub bracket_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4,
            solver_tolerance: 1e-12,
            max_iterations: 100,
            bracket_rounds: 60,
        }
    }
}

impl EngineConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always runs sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the curve count above which loops run in parallel.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver_tolerance = tolerance;
        self
    }

    /// Returns true if `count` curves should be processed in parallel.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count > self.parallel_threshold
    }

    /// Root finder settings.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.solver_tolerance, self.max_iterations)
    }

    /// Parses a config from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CurveError::validation(format!("invalid engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings are usable.
    pub fn validate(&self) -> CurveResult<()> {
        if !(self.solver_tolerance > 0.0 && self.solver_tolerance.is_finite()) {
            return Err(CurveError::validation(format!(
                "solver tolerance must be positive, got {}",
                self.solver_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(CurveError::validation("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

// =============================================================================
// TERM CONVENTIONS
// =============================================================================

/// Market conventions for building one named curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConvention {
    /// Day count of the curve's time axis.
    #[serde(default)]
    pub day_count: DayCountConvention,

    /// Interpolation between points.
    #[serde(default)]
    pub interpolation: InterpolationMethod,

    /// Extrapolation before the first and after the last point.
    #[serde(default = "default_extrapolation")]
    pub extrapolation: (ExtrapolationMethod, ExtrapolationMethod),

    /// Calendar days from as-of to settlement.
    #[serde(default = "default_settlement_days")]
    pub settlement_days: u32,

    /// Native quote convention of the curve's instruments.
    pub quote_type: QuoteType,

    /// Currency of the curve's instruments.
    pub currency: Currency,
}

fn default_extrapolation() -> (ExtrapolationMethod, ExtrapolationMethod) {
    (ExtrapolationMethod::Flat, ExtrapolationMethod::Linear)
}

fn default_settlement_days() -> u32 {
    2
}

impl TermConvention {
    /// Creates a convention with default day count, interpolation and
    /// settlement.
    #[must_use]
    pub fn new(currency: Currency, quote_type: QuoteType) -> Self {
        Self {
            day_count: DayCountConvention::default(),
            interpolation: InterpolationMethod::default(),
            extrapolation: default_extrapolation(),
            settlement_days: default_settlement_days(),
            quote_type,
            currency,
        }
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the settlement lag.
    #[must_use]
    pub fn with_settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = days;
        self
    }

    /// Settlement date for `as_of`.
    pub fn settle_date(&self, as_of: Date) -> Date {
        as_of.add_days(i64::from(self.settlement_days))
    }

    /// Empty curve carrying these conventions.
    pub fn curve(&self, as_of: Date) -> Curve {
        let (left, right) = self.extrapolation;
        Curve::new(as_of)
            .with_day_count(self.day_count)
            .with_interpolation(self.interpolation)
            .with_extrapolation(left, right)
    }
}

/// Named term conventions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveConventions {
    entries: BTreeMap<String, TermConvention>,
}

impl CurveConventions {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Market defaults for the common curves.
    ///
    /// - `USD-SOFR`, `EUR-ESTR`, `GBP-SONIA`: OIS discount curves
    /// - `USD-CDS`: credit spreads
    /// - `EURUSD-FX`: FX outrights
    /// - `BRENT`: commodity forwards
    /// - `USD-CPI`: zero-coupon inflation swaps
    #[must_use]
    pub fn standard() -> Self {
        let mut conventions = Self::new();
        conventions.insert(
            "USD-SOFR",
            TermConvention::new(Currency::USD, QuoteType::Rate).with_day_count(DayCountConvention::Act360),
        );
        conventions.insert(
            "EUR-ESTR",
            TermConvention::new(Currency::EUR, QuoteType::Rate).with_day_count(DayCountConvention::Act360),
        );
        conventions.insert(
            "GBP-SONIA",
            TermConvention::new(Currency::GBP, QuoteType::Rate).with_settlement_days(0),
        );
        conventions.insert(
            "USD-CDS",
            TermConvention::new(Currency::USD, QuoteType::Spread)
                .with_interpolation(InterpolationMethod::LogLinear)
                .with_settlement_days(1),
        );
        conventions.insert(
            "EURUSD-FX",
            TermConvention::new(Currency::USD, QuoteType::FxRate).with_interpolation(InterpolationMethod::Linear),
        );
        conventions.insert(
            "BRENT",
            TermConvention::new(Currency::USD, QuoteType::Price).with_interpolation(InterpolationMethod::Linear),
        );
        conventions.insert(
            "USD-CPI",
            TermConvention::new(Currency::USD, QuoteType::Rate).with_settlement_days(0),
        );
        conventions
    }

    /// Adds or replaces a convention. Names are stored upper case.
    pub fn insert(&mut self, name: impl AsRef<str>, convention: TermConvention) {
        self.entries
            .insert(name.as_ref().to_ascii_uppercase(), convention);
    }

    /// Convention for `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for an unknown name.
    pub fn get(&self, name: &str) -> CurveResult<&TermConvention> {
        self.entries
            .get(&name.to_ascii_uppercase())
            .ok_or_else(|| CurveError::validation(format!("unknown curve convention '{name}'")))
    }

    /// Number of conventions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no conventions are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convention names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Parses conventions from a JSON object keyed by curve name.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        let parsed: BTreeMap<String, TermConvention> = serde_json::from_str(json)
            .map_err(|e| CurveError::validation(format!("invalid curve conventions: {e}")))?;
        let mut conventions = Self::new();
        for (name, convention) in parsed {
            conventions.insert(name, convention);
        }
        conventions.validate()?;
        Ok(conventions)
    }

    /// Serializes conventions to pretty JSON.
    pub fn to_json(&self) -> CurveResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CurveError::validation(format!("cannot serialize conventions: {e}")))
    }

    /// Checks every convention is usable.
    pub fn validate(&self) -> CurveResult<()> {
        for (name, convention) in &self.entries {
            if name.trim().is_empty() {
                return Err(CurveError::validation("curve convention with empty name"));
            }
            if convention.settlement_days > 30 {
                return Err(CurveError::validation(format!(
                    "convention '{name}' settles {} days out",
                    convention.settlement_days
                )));
            }
        }
        Ok(())
    }
}
