//! Bracket search.

use log::trace;

use crate::error::{MathError, MathResult};

/// Grows `[lo, hi]` geometrically until `f` changes sign across it.
///
/// Each round widens the side with the smaller absolute function value by
/// `factor` times the current width, never crossing `floor` on the left.
/// Returns the first bracket found.
///
/// # Errors
///
/// Returns `MathError::InvalidBracket` if no sign change is found within
/// `max_rounds`.
pub fn expand_bracket<F>(
    f: F,
    lo: f64,
    hi: f64,
    floor: f64,
    factor: f64,
    max_rounds: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if !(hi > lo) || factor <= 0.0 {
        return Err(MathError::invalid_input(format!(
            "bad starting bracket [{lo}, {hi}] or factor {factor}"
        )));
    }

    let (mut a, mut b) = (lo.max(floor), hi);
    let (mut fa, mut fb) = (f(a), f(b));

    for round in 0..max_rounds {
        if fa * fb <= 0.0 {
            return Ok((a, b));
        }
        let width = b - a;
        if fa.abs() < fb.abs() && a > floor {
            a = (a - factor * width).max(floor);
            fa = f(a);
        } else {
            b += factor * width;
            fb = f(b);
        }
        trace!("bracket round {round}: [{a}, {b}]");
    }

    if fa * fb <= 0.0 {
        Ok((a, b))
    } else {
        Err(MathError::InvalidBracket { a, b, fa, fb })
    }
}
