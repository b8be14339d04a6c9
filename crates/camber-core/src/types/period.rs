//! Market tenor periods (`ON`, `1W`, `3M`, `5Y`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days.
    Days,
    /// Weeks of seven days.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

/// A market period such as `3M` or `10Y`.
///
/// Overnight style strings (`ON`, `TN`, `SN`) parse to one, two and three
/// days respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit.
    pub unit: TimeUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// A period of `n` days.
    #[must_use]
    pub fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// A period of `n` weeks.
    #[must_use]
    pub fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// A period of `n` months.
    #[must_use]
    pub fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// A period of `n` years.
    #[must_use]
    pub fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Approximate length in years, used for sorting and display only.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.length);
        match self.unit {
            TimeUnit::Days => n / 365.0,
            TimeUnit::Weeks => n * 7.0 / 365.0,
            TimeUnit::Months => n / 12.0,
            TimeUnit::Years => n,
        }
    }

    /// Parses a tenor string, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPeriod` for unknown units or bad numbers.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "ON" | "O/N" => return Ok(Self::days(1)),
            "TN" | "T/N" => return Ok(Self::days(2)),
            "SN" | "S/N" => return Ok(Self::days(3)),
            "" => return Err(CoreError::invalid_period(s, "empty tenor")),
            _ => {}
        }

        let split = upper.len() - 1;
        let (number, unit) = upper.split_at(split);
        let unit = match unit {
            "D" => TimeUnit::Days,
            "W" => TimeUnit::Weeks,
            "M" => TimeUnit::Months,
            "Y" => TimeUnit::Years,
            other => {
                return Err(CoreError::invalid_period(
                    s,
                    format!("unknown unit '{other}'"),
                ))
            }
        };
        let length: i32 = number
            .parse()
            .map_err(|_| CoreError::invalid_period(s, format!("bad length '{number}'")))?;
        Ok(Self::new(length, unit))
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        };
        write!(f, "{}{}", self.length, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_tenors() {
        assert_eq!(Period::parse("3M").unwrap(), Period::months(3));
        assert_eq!(Period::parse("5y").unwrap(), Period::years(5));
        assert_eq!(Period::parse("2W").unwrap(), Period::weeks(2));
        assert_eq!(Period::parse("ON").unwrap(), Period::days(1));
        assert_eq!(Period::parse("T/N").unwrap(), Period::days(2));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Period::parse("").is_err());
        assert!(Period::parse("3Q").is_err());
        assert!(Period::parse("XM").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["1D", "1W", "18M", "30Y"] {
            assert_eq!(Period::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_approx_years() {
        assert_relative_eq!(Period::months(6).approx_years(), 0.5);
        assert_relative_eq!(Period::years(10).approx_years(), 10.0);
    }
}
