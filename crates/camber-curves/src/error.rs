//! Error types for curve calibration and sensitivity operations.
//!
//! The variants follow the lifecycle of a bump campaign: shape checks fail
//! before anything is mutated, quote handlers reject conventions they do
//! not implement, calibrators report the tenor they could not solve, and
//! bulk operations wrap every per-curve failure with the curve it came from.

use camber_core::CoreError;
use camber_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// Mismatched shapes, missing inputs or unknown identifiers.
    #[error("Validation error: {message}")]
    Validation {
        /// What failed validation.
        message: String,
    },

    /// A quote handler was asked for a convention it does not implement.
    #[error("Quote handler '{handler}' does not support quote type {requested}")]
    QuoteConversionNotSupported {
        /// Name of the quote handler.
        handler: String,
        /// The requested quote type.
        requested: String,
    },

    /// A tenor could not be solved to tolerance.
    #[error("Calibration failed at tenor '{tenor}': {message}")]
    CalibrationFailure {
        /// Name of the failing tenor.
        tenor: String,
        /// Description of the failure.
        message: String,
    },

    /// A calibration failure raised inside a multi-curve operation.
    #[error("Curve #{curve_index} '{curve_name}' failed at tenor '{tenor}': {source}")]
    CurveCalibration {
        /// Position of the curve in the input set.
        curve_index: usize,
        /// Name of the curve.
        curve_name: String,
        /// Name of the failing tenor.
        tenor: String,
        /// The underlying calibration error.
        #[source]
        source: Box<CurveError>,
    },

    /// Any other failure raised inside a multi-curve operation.
    #[error("Curve #{curve_index} '{curve_name}': {source}")]
    Curve {
        /// Position of the curve in the input set.
        curve_index: usize,
        /// Name of the curve.
        curve_name: String,
        /// The underlying error.
        #[source]
        source: Box<CurveError>,
    },

    /// Business-rule violation (unsupported product, negative probability, ...).
    #[error("Domain error: {message}")]
    Domain {
        /// Description of the violation.
        message: String,
    },

    /// A curve depends on itself, directly or transitively.
    #[error("Dependency cycle: {path}")]
    DependencyCycle {
        /// The dependency path that closes the cycle.
        path: String,
    },

    /// A parent curve has not been fitted yet.
    #[error("Curve '{curve}' depends on '{parent}', which is not fitted")]
    ParentNotFitted {
        /// The dependent curve.
        curve: String,
        /// The unfitted parent.
        parent: String,
    },

    /// The curve was queried before a successful fit.
    #[error("Curve '{curve}' is not fitted")]
    NotFitted {
        /// Name of the curve.
        curve: String,
    },

    /// Date or convention error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Numerical error from the math crate.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a conversion-not-supported error.
    #[must_use]
    pub fn conversion_not_supported(handler: impl Into<String>, requested: impl Into<String>) -> Self {
        Self::QuoteConversionNotSupported {
            handler: handler.into(),
            requested: requested.into(),
        }
    }

    /// Creates a calibration failure error.
    #[must_use]
    pub fn calibration_failed(tenor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CalibrationFailure {
            tenor: tenor.into(),
            message: message.into(),
        }
    }

    /// Creates a domain error.
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// Creates a dependency cycle error.
    #[must_use]
    pub fn dependency_cycle(path: impl Into<String>) -> Self {
        Self::DependencyCycle { path: path.into() }
    }

    /// Creates a not-fitted error.
    #[must_use]
    pub fn not_fitted(curve: impl Into<String>) -> Self {
        Self::NotFitted {
            curve: curve.into(),
        }
    }

    /// Wraps an error with the identity of the curve it came from.
    ///
    /// Calibration failures become `CurveCalibration`, keeping the tenor;
    /// everything else becomes `Curve`. Already wrapped errors pass through.
    #[must_use]
    pub fn in_curve(self, curve_index: usize, curve_name: &str) -> Self {
        let curve_name = curve_name.to_string();
        match self {
            Self::CurveCalibration { .. } | Self::Curve { .. } => self,
            Self::CalibrationFailure { tenor, message } => Self::CurveCalibration {
                curve_index,
                curve_name,
                tenor: tenor.clone(),
                source: Box::new(Self::CalibrationFailure { tenor, message }),
            },
            other => Self::Curve {
                curve_index,
                curve_name,
                source: Box::new(other),
            },
        }
    }

    /// The error with any curve wrapper removed.
    #[must_use]
    pub fn root_cause(&self) -> &CurveError {
        match self {
            Self::CurveCalibration { source, .. } | Self::Curve { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Index and name of the curve the error was raised for, if wrapped.
    #[must_use]
    pub fn curve(&self) -> Option<(usize, &str)> {
        match self {
            Self::CurveCalibration {
                curve_index,
                curve_name,
                ..
            }
            | Self::Curve {
                curve_index,
                curve_name,
                ..
            } => Some((*curve_index, curve_name.as_str())),
            _ => None,
        }
    }

    /// Returns true for calibration failures, wrapped or not.
    #[must_use]
    pub fn is_calibration_failure(&self) -> bool {
        matches!(
            self,
            Self::CalibrationFailure { .. } | Self::CurveCalibration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::calibration_failed("5Y", "no root in bracket");
        assert_eq!(
            err.to_string(),
            "Calibration failed at tenor '5Y': no root in bracket"
        );

        let err = CurveError::conversion_not_supported("ParRate", "Price");
        assert!(err.to_string().contains("does not support quote type Price"));
    }

    #[test]
    fn test_in_curve_wraps_calibration_failures() {
        let err = CurveError::calibration_failed("3M", "diverged").in_curve(2, "USD-SOFR");
        match &err {
            CurveError::CurveCalibration {
                curve_index,
                curve_name,
                tenor,
                source,
            } => {
                assert_eq!(*curve_index, 2);
                assert_eq!(curve_name, "USD-SOFR");
                assert_eq!(tenor, "3M");
                assert!(matches!(**source, CurveError::CalibrationFailure { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_calibration_failure());
        assert!(err.to_string().contains("Curve #2 'USD-SOFR'"));
    }

    #[test]
    fn test_in_curve_wraps_other_errors() {
        let err = CurveError::domain("negative survival").in_curve(0, "CDX");
        assert!(matches!(err, CurveError::Curve { curve_index: 0, .. }));
        assert_eq!(err.curve(), Some((0, "CDX")));
        assert!(matches!(err.root_cause(), CurveError::Domain { .. }));
        assert!(!err.is_calibration_failure());
        assert_eq!(err.to_string(), "Curve #0 'CDX': Domain error: negative survival");
    }

    #[test]
    fn test_in_curve_does_not_wrap_twice() {
        let err = CurveError::validation("bad").in_curve(1, "A").in_curve(4, "B");
        assert_eq!(err.curve(), Some((1, "A")));
        assert!(CurveError::validation("bad").curve().is_none());
    }

    #[test]
    fn test_from_math_error() {
        let err: CurveError = MathError::insufficient_data(1, 0).into();
        assert!(matches!(err, CurveError::Math(_)));
    }
}
