//! Error types for core date and convention handling.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building dates, periods and conventions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Date could not be constructed or fell out of range.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Tenor string could not be parsed.
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod {
        /// The string that failed to parse.
        input: String,
        /// Why it failed.
        reason: String,
    },

    /// Identifier did not match any known convention or currency.
    #[error("Unknown {kind} identifier: {value}")]
    UnknownIdentifier {
        /// What was being looked up (e.g. "currency", "day count").
        kind: &'static str,
        /// The unrecognized value.
        value: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown identifier error.
    #[must_use]
    pub fn unknown_identifier(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownIdentifier {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30");
        assert!(err.to_string().contains("Invalid date"));

        let err = CoreError::invalid_period("3Q", "unknown unit 'Q'");
        assert!(err.to_string().contains("3Q"));

        let err = CoreError::unknown_identifier("currency", "XXX");
        assert_eq!(err.to_string(), "Unknown currency identifier: XXX");
    }
}
