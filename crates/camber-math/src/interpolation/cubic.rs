//! Natural cubic spline segments.

use crate::error::{MathError, MathResult};

/// Solves the tridiagonal system for the spline's second derivatives with
/// zero curvature at both ends.
pub(crate) fn second_derivatives(xs: &[f64], ys: &[f64]) -> MathResult<Vec<f64>> {
    let n = xs.len();
    if n < 3 {
        return Err(MathError::insufficient_data(3, n));
    }

    let mut y2 = vec![0.0; n];
    let mut u = vec![0.0; n];

    for i in 1..n - 1 {
        let h_prev = xs[i] - xs[i - 1];
        let h_next = xs[i + 1] - xs[i];
        if h_prev <= 0.0 || h_next <= 0.0 {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }
        let sig = h_prev / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        let slope_diff = (ys[i + 1] - ys[i]) / h_next - (ys[i] - ys[i - 1]) / h_prev;
        u[i] = (6.0 * slope_diff / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    for k in (0..n - 1).rev() {
        y2[k] = y2[k] * y2[k + 1] + u[k];
    }
    Ok(y2)
}

/// Evaluates the cubic on `[xs[i], xs[i+1]]` at `t`.
pub(crate) fn evaluate_segment(xs: &[f64], ys: &[f64], y2: &[f64], t: f64, i: usize) -> f64 {
    let h = xs[i + 1] - xs[i];
    let a = (xs[i + 1] - t) / h;
    let b = (t - xs[i]) / h;
    a * ys[i]
        + b * ys[i + 1]
        + ((a * a * a - a) * y2[i] + (b * b * b - b) * y2[i + 1]) * h * h / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_natural_end_conditions() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 4.0, 9.0];
        let y2 = second_derivatives(&xs, &ys).unwrap();
        assert_relative_eq!(y2[0], 0.0);
        assert_relative_eq!(y2[3], 0.0);
    }

    #[test]
    fn test_reproduces_straight_line() {
        let xs = [0.0, 1.0, 3.0, 4.0];
        let ys = [1.0, 3.0, 7.0, 9.0];
        let y2 = second_derivatives(&xs, &ys).unwrap();
        assert_relative_eq!(evaluate_segment(&xs, &ys, &y2, 2.0, 1), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_unsorted() {
        assert!(second_derivatives(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
    }
}
