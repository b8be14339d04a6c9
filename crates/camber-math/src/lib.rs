//! # Camber Math
//!
//! Numerical building blocks for the Camber curve framework.
//!
//! - **Interpolation**: a point-wise kernel that locates the bracketing
//!   interval for a time `t` and evaluates the chosen method on it
//! - **Extrapolation**: flat, linear or forbidden extension past either end
//! - **Solvers**: bracketing (Brent, bisection) and Newton-Raphson root finders
//!
//! The kernel works on plain `&[f64]` slices. Curves own their storage and
//! hand the kernel a view; nothing here keeps state between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        evaluate, extrapolate, interpolate, locate, value_at, ExtrapolationMethod,
        InterpolationMethod,
    };
    pub use crate::solvers::{
        bisection, brent, expand_bracket, newton_raphson, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
