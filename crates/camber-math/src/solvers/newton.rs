//! Newton-Raphson method.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Finds a root of `f` from `initial_guess` using its derivative `df`.
///
/// # Example
///
/// ```rust
/// use camber_math::solvers::{newton_raphson, SolverConfig};
///
/// let r = newton_raphson(|x| x * x - 2.0, |x| 2.0 * x, 1.5, &SolverConfig::default()).unwrap();
/// assert!((r.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);
        if dfx.abs() < 1e-15 {
            return Err(MathError::ZeroDerivative { x });
        }

        let step = fx / dfx;
        x -= step;
        if !x.is_finite() {
            return Err(MathError::invalid_input("Newton iterate diverged"));
        }
        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, f(x).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_newton_annuity_yield() {
        // 5% annual coupon, 3 years, price 100 => yield 5%
        let price = |y: f64| (1..=3).map(|t| 5.0 / (1.0 + y).powi(t)).sum::<f64>() + 100.0 / (1.0 + y).powi(3);
        let dprice = |y: f64| {
            (1..=3).map(|t| -f64::from(t) * 5.0 / (1.0 + y).powi(t + 1)).sum::<f64>()
                - 300.0 / (1.0 + y).powi(4)
        };
        let r = newton_raphson(|y| price(y) - 100.0, dprice, 0.02, &SolverConfig::default()).unwrap();
        assert_relative_eq!(r.root, 0.05, epsilon = 1e-10);
    }

    #[test]
    fn test_newton_zero_derivative() {
        let err = newton_raphson(|x| x * x + 1.0, |x| 2.0 * x, 0.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::ZeroDerivative { .. }));
    }
}
