//! Day count conventions.
//!
//! A curve measures its time axis with a day count: interpolation and
//! extrapolation happen in year fractions from the as-of date, not in raw
//! calendar days.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Supported day count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    #[default]
    Act365Fixed,
    /// 30/360 US (Bond Basis).
    Thirty360,
}

impl DayCountConvention {
    /// Returns the year fraction between two dates.
    ///
    /// Negative when `end` precedes `start`.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => start.days_between(&end) as f64 / 360.0,
            DayCountConvention::Act365Fixed => start.days_between(&end) as f64 / 365.0,
            DayCountConvention::Thirty360 => thirty_360_days(start, end) as f64 / 360.0,
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Thirty360 => "30/360",
        }
    }
}

fn thirty_360_days(start: Date, end: Date) -> i64 {
    let d1 = start.day().min(30);
    let d2 = if d1 == 30 { end.day().min(30) } else { end.day() };
    let years = i64::from(end.year() - start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    let days = i64::from(d2) - i64::from(d1);
    360 * years + 30 * months + days
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(' ', "").as_str() {
            "ACT/360" | "A360" | "ACTUAL/360" => Ok(DayCountConvention::Act360),
            "ACT/365F" | "ACT/365" | "A365F" | "ACTUAL/365FIXED" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "30/360" | "30/360US" | "BONDBASIS" => Ok(DayCountConvention::Thirty360),
            _ => Err(CoreError::unknown_identifier("day count", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_act_conventions() {
        let start = d(2025, 1, 1);
        let end = d(2026, 1, 1);
        assert_relative_eq!(DayCountConvention::Act365Fixed.year_fraction(start, end), 1.0);
        assert_relative_eq!(
            DayCountConvention::Act360.year_fraction(start, end),
            365.0 / 360.0
        );
        assert_relative_eq!(
            DayCountConvention::Act365Fixed.year_fraction(end, start),
            -1.0
        );
    }

    #[test]
    fn test_thirty_360() {
        let dc = DayCountConvention::Thirty360;
        assert_relative_eq!(dc.year_fraction(d(2025, 1, 31), d(2025, 7, 31)), 0.5);
        assert_relative_eq!(dc.year_fraction(d(2025, 2, 15), d(2025, 3, 15)), 30.0 / 360.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "act/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
        assert_eq!(
            "30/360".parse::<DayCountConvention>().unwrap().to_string(),
            "30/360"
        );
        assert!("ACT/ACT ICMA".parse::<DayCountConvention>().is_err());
    }
}
