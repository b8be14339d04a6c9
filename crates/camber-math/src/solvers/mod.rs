//! Root finders used by curve bootstrapping and quote conversion.
//!
//! - [`brent`]: bracketing, superlinear; solves each bootstrapped point
//! - [`bisection`]: bracketing, linear; takes over when Brent runs out of
//!   iterations on a bracket
//! - [`newton_raphson`]: needs a derivative; inverts CDS upfront fees
//! - [`expand_bracket`]: grows an interval until it straddles a root

mod bisection;
mod bracket;
mod brent;
mod newton;

pub use bisection::bisection;
pub use bracket::expand_bracket;
pub use brent::brent;
pub use newton::newton_raphson;

use serde::{Deserialize, Serialize};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Tolerance on both the residual and the bracket width.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Outcome of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}
