//! Point-wise interpolation kernel.
//!
//! Curves store their points as strictly increasing times `xs` (year
//! fractions from the as-of date) with values `ys`. The kernel answers two
//! questions:
//!
//! - [`locate`]: which interval `[xs[i], xs[i+1]]` brackets `t`
//! - [`evaluate`]: the interpolated value at `t` given that interval index
//!
//! [`value_at`] combines both with the curve's left/right extrapolation
//! policy, which is what curve strategies normally call.
//!
//! # Choosing a Method
//!
//! | Method | Space | Smoothness | Typical curve |
//! |--------|-------|------------|---------------|
//! | Linear | value | C0 | spreads, basis, seasonality |
//! | LogLinear | ln(value) | C0 | discount factors, survival |
//! | PiecewiseConstant | value | step | hazard-style inputs |
//! | CubicSpline | value | C2 | smoothed zero rates |

mod cubic;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, MathResult};

/// Interpolation method applied between two curve points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Straight line between points.
    Linear,
    /// Linear in the logarithm of the value (flat forward on discount factors).
    #[default]
    LogLinear,
    /// Value of the right-hand point on `(x_i, x_{i+1}]`.
    PiecewiseConstant,
    /// Natural cubic spline through all points.
    CubicSpline,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpolationMethod::Linear => "Linear",
            InterpolationMethod::LogLinear => "LogLinear",
            InterpolationMethod::PiecewiseConstant => "PiecewiseConstant",
            InterpolationMethod::CubicSpline => "CubicSpline",
        };
        f.write_str(name)
    }
}

/// Behaviour of a curve outside its first and last points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtrapolationMethod {
    /// Hold the end value constant.
    #[default]
    Flat,
    /// Continue the end segment in the interpolation space.
    Linear,
    /// Reject queries outside the point range.
    None,
}

/// Returns the index `i` of the interval `[xs[i], xs[i+1]]` used for `t`.
///
/// Points outside the range map to the first or last interval. With fewer
/// than two points the index is always 0.
pub fn locate(xs: &[f64], t: f64) -> usize {
    if xs.len() < 2 {
        return 0;
    }
    xs.partition_point(|&x| x <= t)
        .saturating_sub(1)
        .min(xs.len() - 2)
}

/// Evaluates `method` at `t` on the given interval.
///
/// `t` is not required to lie inside the interval: the segment formula is
/// simply continued, which is how linear extrapolation is produced.
///
/// # Errors
///
/// Fails on empty or mismatched input, an interval index out of range,
/// or non-positive values under [`InterpolationMethod::LogLinear`].
pub fn evaluate(
    method: InterpolationMethod,
    xs: &[f64],
    ys: &[f64],
    t: f64,
    interval: usize,
) -> MathResult<f64> {
    check_points(xs, ys)?;
    if xs.len() == 1 {
        return Ok(ys[0]);
    }
    if interval + 1 >= xs.len() {
        return Err(MathError::invalid_input(format!(
            "interval {interval} out of range for {} points",
            xs.len()
        )));
    }

    let (x0, x1) = (xs[interval], xs[interval + 1]);
    let (y0, y1) = (ys[interval], ys[interval + 1]);
    let w = (t - x0) / (x1 - x0);

    match method {
        InterpolationMethod::Linear => Ok(y0 + (y1 - y0) * w),
        InterpolationMethod::LogLinear => {
            if y0 <= 0.0 || y1 <= 0.0 {
                return Err(MathError::invalid_input(format!(
                    "log-linear interpolation needs positive values, got {y0} and {y1}"
                )));
            }
            let (l0, l1) = (y0.ln(), y1.ln());
            Ok((l0 + (l1 - l0) * w).exp())
        }
        InterpolationMethod::PiecewiseConstant => Ok(if t <= x0 { y0 } else { y1 }),
        InterpolationMethod::CubicSpline => {
            if xs.len() < 3 {
                return Ok(y0 + (y1 - y0) * w);
            }
            let y2 = cubic::second_derivatives(xs, ys)?;
            Ok(cubic::evaluate_segment(xs, ys, &y2, t, interval))
        }
    }
}

/// Interpolates at `t` without any range policy.
pub fn interpolate(method: InterpolationMethod, xs: &[f64], ys: &[f64], t: f64) -> MathResult<f64> {
    evaluate(method, xs, ys, t, locate(xs, t))
}

/// Extrapolates past either end of the data.
///
/// Linear extrapolation continues the end segment in the method's own space
/// (log space for `LogLinear`); a spline is continued with the straight
/// line through its end points. A single point always extrapolates flat.
///
/// # Errors
///
/// Returns `MathError::ExtrapolationNotAllowed` for [`ExtrapolationMethod::None`].
pub fn extrapolate(
    extrapolation: ExtrapolationMethod,
    method: InterpolationMethod,
    xs: &[f64],
    ys: &[f64],
    t: f64,
) -> MathResult<f64> {
    check_points(xs, ys)?;
    let last = xs.len() - 1;
    let left = t < xs[0];

    match extrapolation {
        ExtrapolationMethod::None => Err(MathError::ExtrapolationNotAllowed {
            x: t,
            min: xs[0],
            max: xs[last],
        }),
        ExtrapolationMethod::Flat => Ok(if left { ys[0] } else { ys[last] }),
        ExtrapolationMethod::Linear => {
            if last == 0 {
                return Ok(ys[0]);
            }
            let interval = if left { 0 } else { last - 1 };
            let segment_method = match method {
                InterpolationMethod::PiecewiseConstant => {
                    return Ok(if left { ys[0] } else { ys[last] })
                }
                InterpolationMethod::CubicSpline => InterpolationMethod::Linear,
                other => other,
            };
            evaluate(segment_method, xs, ys, t, interval)
        }
    }
}

/// Value at `t` with separate left and right extrapolation policies.
///
/// # Errors
///
/// Propagates kernel errors, including a rejected extrapolation.
pub fn value_at(
    method: InterpolationMethod,
    left: ExtrapolationMethod,
    right: ExtrapolationMethod,
    xs: &[f64],
    ys: &[f64],
    t: f64,
) -> MathResult<f64> {
    check_points(xs, ys)?;
    let last = xs.len() - 1;
    if t < xs[0] {
        extrapolate(left, method, xs, ys, t)
    } else if t > xs[last] {
        extrapolate(right, method, xs, ys, t)
    } else {
        interpolate(method, xs, ys, t)
    }
}

fn check_points(xs: &[f64], ys: &[f64]) -> MathResult<()> {
    if xs.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const XS: [f64; 4] = [0.5, 1.0, 2.0, 5.0];
    const YS: [f64; 4] = [0.99, 0.98, 0.95, 0.85];

    #[test]
    fn test_locate() {
        assert_eq!(locate(&XS, 0.1), 0);
        assert_eq!(locate(&XS, 0.5), 0);
        assert_eq!(locate(&XS, 1.0), 1);
        assert_eq!(locate(&XS, 1.5), 1);
        assert_eq!(locate(&XS, 5.0), 2);
        assert_eq!(locate(&XS, 9.0), 2);
        assert_eq!(locate(&[1.0], 3.0), 0);
    }

    #[test]
    fn test_all_methods_hit_points() {
        for method in [
            InterpolationMethod::Linear,
            InterpolationMethod::LogLinear,
            InterpolationMethod::PiecewiseConstant,
            InterpolationMethod::CubicSpline,
        ] {
            for (x, y) in XS.iter().zip(YS.iter()) {
                assert_relative_eq!(interpolate(method, &XS, &YS, *x).unwrap(), *y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_log_linear_is_flat_forward() {
        let v = interpolate(InterpolationMethod::LogLinear, &XS, &YS, 1.5).unwrap();
        assert_relative_eq!(v, (0.98_f64 * 0.95).sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_log_linear_rejects_non_positive() {
        let ys = [1.0, 0.0];
        assert!(interpolate(InterpolationMethod::LogLinear, &[0.0, 1.0], &ys, 0.5).is_err());
    }

    #[test]
    fn test_piecewise_constant_is_right_continuous_on_interval() {
        let v = interpolate(InterpolationMethod::PiecewiseConstant, &XS, &YS, 1.2).unwrap();
        assert_relative_eq!(v, 0.95);
    }

    #[test]
    fn test_extrapolation_policies() {
        let m = InterpolationMethod::Linear;
        let flat = value_at(m, ExtrapolationMethod::Flat, ExtrapolationMethod::Flat, &XS, &YS, 7.0);
        assert_relative_eq!(flat.unwrap(), 0.85);

        let lin = value_at(m, ExtrapolationMethod::Linear, ExtrapolationMethod::Linear, &XS, &YS, 0.0);
        assert_relative_eq!(lin.unwrap(), 1.0, epsilon = 1e-12);

        let none = value_at(m, ExtrapolationMethod::None, ExtrapolationMethod::Flat, &XS, &YS, 0.1);
        assert!(matches!(none, Err(MathError::ExtrapolationNotAllowed { .. })));
    }

    #[test]
    fn test_single_point() {
        let v = value_at(
            InterpolationMethod::CubicSpline,
            ExtrapolationMethod::Linear,
            ExtrapolationMethod::Linear,
            &[1.0],
            &[0.97],
            3.0,
        );
        assert_relative_eq!(v.unwrap(), 0.97);
    }

    #[test]
    fn test_empty_and_mismatched() {
        assert!(interpolate(InterpolationMethod::Linear, &[], &[], 1.0).is_err());
        assert!(interpolate(InterpolationMethod::Linear, &[1.0, 2.0], &[1.0], 1.0).is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&InterpolationMethod::LogLinear).unwrap();
        assert_eq!(json, "\"LogLinear\"");
        let ext: ExtrapolationMethod = serde_json::from_str("\"None\"").unwrap();
        assert_eq!(ext, ExtrapolationMethod::None);
    }

    proptest! {
        #[test]
        fn prop_locate_brackets(t in 0.5f64..5.0) {
            let i = locate(&XS, t);
            prop_assert!(XS[i] <= t);
            prop_assert!(t <= XS[i + 1]);
        }

        #[test]
        fn prop_linear_stays_within_neighbours(t in 0.5f64..5.0) {
            let i = locate(&XS, t);
            let v = interpolate(InterpolationMethod::Linear, &XS, &YS, t).unwrap();
            let (lo, hi) = (YS[i].min(YS[i + 1]), YS[i].max(YS[i + 1]));
            prop_assert!(v >= lo - 1e-12 && v <= hi + 1e-12);
        }
    }
}
