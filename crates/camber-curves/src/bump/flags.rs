//! Quote-level bump arithmetic shared by every quote handler.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// How a bump is applied to a quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BumpFlags {
    /// Scale the bump by the quote (or by a pip unit) instead of adding it.
    pub relative: bool,
    /// Bump downwards.
    pub down: bool,
    /// Let the quote cross its domain boundary.
    pub allow_cross_zero: bool,
}

impl BumpFlags {
    /// Absolute upward bump.
    #[must_use]
    pub fn absolute() -> Self {
        Self::default()
    }

    /// Relative upward bump.
    #[must_use]
    pub fn relative() -> Self {
        Self {
            relative: true,
            ..Self::default()
        }
    }

    /// Same flags, bumping downwards.
    #[must_use]
    pub fn down(mut self) -> Self {
        self.down = true;
        self
    }

    /// Same flags, allowing the quote to cross its boundary.
    #[must_use]
    pub fn allow_cross_zero(mut self) -> Self {
        self.allow_cross_zero = true;
        self
    }
}

/// Unit a relative bump is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BumpUnit {
    /// Multiplicative: up by `q * (1 + x)`, down by `q / (1 + x)`.
    Proportional,
    /// Additive in multiples of a pip of the given size.
    Pip(f64),
}

/// Result of bumping one quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BumpOutcome {
    /// New quote value.
    pub value: f64,
    /// Signed bump actually applied, in the bump's own unit.
    pub realized: f64,
    /// True if the move was cut short at the domain boundary.
    pub clamped: bool,
}

/// Applies a bump of `size` to `current`.
///
/// The signed amount is `+size` or `-size` depending on `flags.down`.
/// Relative bumps scale by the quote (`Proportional`) or by a pip. If the
/// proposed value would reach `lower_bound` while moving down, the quote
/// moves half the remaining distance to the boundary instead.
///
/// The realized bump is normalized so that an up bump followed by a down
/// bump of the same size and flags restores the quote: an absolute bump
/// reports the quote change, a proportional bump reports `+x` or `-x`, a
/// pip bump reports the change in pips.
///
/// # Errors
///
/// Returns `CurveError::Validation` for non-finite inputs or a proportional
/// factor `1 + size` that is not positive.
pub fn apply_bump(
    current: f64,
    size: f64,
    flags: BumpFlags,
    unit: BumpUnit,
    lower_bound: Option<f64>,
) -> CurveResult<BumpOutcome> {
    if !current.is_finite() || !size.is_finite() {
        return Err(CurveError::validation(format!(
            "cannot bump quote {current} by {size}"
        )));
    }
    let sign = if flags.down { -1.0 } else { 1.0 };

    let proposed = match (flags.relative, unit) {
        (false, _) => current + sign * size,
        (true, BumpUnit::Proportional) => {
            let factor = 1.0 + size;
            if factor <= 0.0 {
                return Err(CurveError::validation(format!(
                    "relative bump {size} gives non-positive factor {factor}"
                )));
            }
            if flags.down {
                current / factor
            } else {
                current * factor
            }
        }
        (true, BumpUnit::Pip(pip)) => current + sign * size * pip,
    };

    let crosses = !flags.allow_cross_zero
        && lower_bound.is_some_and(|bound| proposed <= bound && proposed < current);
    let value = match lower_bound {
        Some(bound) if crosses => {
            if current > bound {
                current - 0.5 * (current - bound)
            } else {
                current
            }
        }
        _ => proposed,
    };

    let realized = match (flags.relative, unit) {
        (false, _) => value - current,
        (true, BumpUnit::Proportional) => {
            if flags.down {
                if value == 0.0 {
                    0.0
                } else {
                    -(current / value - 1.0)
                }
            } else if current == 0.0 {
                0.0
            } else {
                value / current - 1.0
            }
        }
        (true, BumpUnit::Pip(pip)) => (value - current) / pip,
    };

    Ok(BumpOutcome {
        value,
        realized,
        clamped: crosses,
    })
}
