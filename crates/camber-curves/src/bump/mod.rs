//! Bump, refit and hedge campaigns over curve sets.
//!
//! A campaign bumps selected tenor quotes on each curve through the tenors'
//! quote handlers, refits each curve once from its earliest bumped tenor and
//! reports the average realized bump per curve. Curves are independent:
//! each task locks only its own curve and fills only its own result slot,
//! so the per-curve loop runs on rayon once the set is large enough.
//!
//! ```text
//! validate spec ─> check cycles ─> for each curve (maybe parallel):
//!     bump selected tenors in tenor order ─> refit(min index) ─> average
//! ```

mod engine;
mod flags;
mod hedge;
mod query;

pub use engine::{bump_curves, bump_curves_isolated};
pub use flags::{apply_bump, BumpFlags, BumpOutcome, BumpUnit};
pub use hedge::{hedge_curves, HedgeTarget};
pub use query::{closest_tenor, commit_quotes, reset_quotes, unique_tenor_names, ClosestTenor};

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// What to bump and how.
///
/// # Example
///
/// ```rust
/// use camber_curves::bump::BumpSpec;
///
/// // 1bp parallel shift, no refit
/// let parallel = BumpSpec::all(0.0001).without_refit();
///
/// // 10% relative bump of the 5Y tenor, downwards
/// let five_year = BumpSpec::tenor("5Y", 0.1).relative().down();
/// assert!(five_year.flags.relative && five_year.flags.down);
/// # let _ = parallel;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BumpSpec {
    /// Tenor names to bump, matched case-insensitively; `None` bumps all.
    pub tenor_names: Option<Vec<String>>,
    /// One size for every selected tenor, or one per name.
    pub sizes: Vec<f64>,
    /// Direction and mode.
    pub flags: BumpFlags,
    /// Per-curve multipliers applied to every size.
    pub weights: Option<Vec<f64>>,
    /// Refit each curve after bumping.
    pub refit: bool,
}

impl BumpSpec {
    /// Bumps every tenor by `size`.
    #[must_use]
    pub fn all(size: f64) -> Self {
        Self {
            tenor_names: None,
            sizes: vec![size],
            flags: BumpFlags::absolute(),
            weights: None,
            refit: true,
        }
    }

    /// Bumps one named tenor.
    #[must_use]
    pub fn tenor(name: impl Into<String>, size: f64) -> Self {
        Self {
            tenor_names: Some(vec![name.into()]),
            ..Self::all(size)
        }
    }

    /// Bumps named tenors, each by its own size.
    #[must_use]
    pub fn tenors<S: Into<String>>(names: impl IntoIterator<Item = S>, sizes: Vec<f64>) -> Self {
        Self {
            tenor_names: Some(names.into_iter().map(Into::into).collect()),
            sizes,
            ..Self::all(0.0)
        }
    }

    /// Makes the bump relative.
    #[must_use]
    pub fn relative(mut self) -> Self {
        self.flags.relative = true;
        self
    }

    /// Bumps downwards.
    #[must_use]
    pub fn down(mut self) -> Self {
        self.flags.down = true;
        self
    }

    /// Lets quotes cross their domain boundary.
    #[must_use]
    pub fn allow_cross_zero(mut self) -> Self {
        self.flags.allow_cross_zero = true;
        self
    }

    /// Sets per-curve weights.
    #[must_use]
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Bumps quotes without refitting.
    #[must_use]
    pub fn without_refit(mut self) -> Self {
        self.refit = false;
        self
    }

    /// Size for the `k`-th selected name.
    pub fn size_for(&self, k: usize) -> f64 {
        if self.sizes.len() == 1 {
            self.sizes[0]
        } else {
            self.sizes.get(k).copied().unwrap_or(f64::NAN)
        }
    }

    /// Weight for curve `index`.
    pub fn weight_for(&self, index: usize) -> f64 {
        self.weights
            .as_ref()
            .and_then(|w| w.get(index).copied())
            .unwrap_or(1.0)
    }

    /// Checks the spec against a set of `curve_count` curves.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for an empty curve set, missing
    /// sizes, several sizes paired with "all tenors", sizes or weights that
    /// do not line up with names or curves, or non-finite numbers.
    pub fn validate(&self, curve_count: usize) -> CurveResult<()> {
        if curve_count == 0 {
            return Err(CurveError::validation("bump requires at least one curve"));
        }
        if self.sizes.is_empty() {
            return Err(CurveError::validation("bump requires at least one size"));
        }
        match &self.tenor_names {
            None if self.sizes.len() > 1 => {
                return Err(CurveError::validation(format!(
                    "{} bump sizes given for all tenors; use one size or name the tenors",
                    self.sizes.len()
                )));
            }
            Some(names) if names.is_empty() => {
                return Err(CurveError::validation("bump tenor list is empty"));
            }
            Some(names) if self.sizes.len() != 1 && self.sizes.len() != names.len() => {
                return Err(CurveError::validation(format!(
                    "{} bump sizes for {} tenor names",
                    self.sizes.len(),
                    names.len()
                )));
            }
            _ => {}
        }
        if let Some(weights) = &self.weights {
            if weights.len() != curve_count {
                return Err(CurveError::validation(format!(
                    "{} weights for {curve_count} curves",
                    weights.len()
                )));
            }
            if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
                return Err(CurveError::validation(format!("non-finite curve weight {bad}")));
            }
        }
        if let Some(bad) = self.sizes.iter().find(|s| !s.is_finite()) {
            return Err(CurveError::validation(format!("non-finite bump size {bad}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_shapes() {
        assert!(BumpSpec::all(0.0001).validate(0).is_err());
        assert!(BumpSpec::all(0.0001).validate(3).is_ok());

        let mut multi = BumpSpec::all(0.0001);
        multi.sizes = vec![0.0001, 0.0002];
        assert!(multi.validate(1).is_err());

        assert!(BumpSpec::tenors(["1Y", "2Y"], vec![0.1, 0.2, 0.3]).validate(1).is_err());
        assert!(BumpSpec::tenors(["1Y", "2Y"], vec![0.1, 0.2]).validate(1).is_ok());
        assert!(BumpSpec::tenors(Vec::<String>::new(), vec![0.1]).validate(1).is_err());

        let weighted = BumpSpec::all(0.0001).with_weights(vec![1.0, 2.0]);
        assert!(weighted.validate(3).is_err());
        assert!(weighted.validate(2).is_ok());

        assert!(BumpSpec::all(f64::NAN).validate(1).is_err());
    }

    #[test]
    fn test_sizes_and_weights() {
        let spec = BumpSpec::tenors(["1Y", "2Y"], vec![0.1, 0.2]).with_weights(vec![0.5]);
        assert_eq!(spec.size_for(1), 0.2);
        assert_eq!(spec.weight_for(0), 0.5);
        assert_eq!(BumpSpec::tenor("1Y", 0.3).size_for(4), 0.3);
    }

    #[test]
    fn test_spec_serde() {
        let spec = BumpSpec::tenor("5Y", 0.1).relative().down();
        let json = serde_json::to_string(&spec).unwrap();
        let back: BumpSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
