//! Accrual schedules.

use camber_core::{Date, DayCountConvention};

use crate::error::{CurveError, CurveResult};

/// One accrual period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualPeriod {
    /// Accrual start.
    pub start: Date,
    /// Accrual end and payment date.
    pub end: Date,
    /// Year fraction of the period.
    pub fraction: f64,
}

/// Generates periods of `months` rolling backwards from `end`.
///
/// Any stub lands at the front. No business-day adjustment is applied.
///
/// # Errors
///
/// Returns `CurveError::Validation` if `end <= start` or `months <= 0`.
pub fn accrual_periods(
    start: Date,
    end: Date,
    months: i32,
    day_count: DayCountConvention,
) -> CurveResult<Vec<AccrualPeriod>> {
    if end <= start {
        return Err(CurveError::validation(format!(
            "schedule end {end} must be after start {start}"
        )));
    }
    if months <= 0 {
        return Err(CurveError::validation(format!(
            "schedule frequency must be positive, got {months} months"
        )));
    }

    let mut dates = vec![end];
    let mut step = 1;
    loop {
        let date = end.add_months(-months * step)?;
        if date <= start {
            break;
        }
        dates.push(date);
        step += 1;
    }
    dates.push(start);
    dates.reverse();

    Ok(dates
        .windows(2)
        .map(|w| AccrualPeriod {
            start: w[0],
            end: w[1],
            fraction: day_count.year_fraction(w[0], w[1]),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_schedule() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = Date::from_ymd(2027, 1, 15).unwrap();
        let periods = accrual_periods(start, end, 6, DayCountConvention::Thirty360).unwrap();
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].start, start);
        assert_eq!(periods[3].end, end);
        assert!(periods.iter().all(|p| (p.fraction - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_front_stub() {
        let start = Date::from_ymd(2025, 2, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 15).unwrap();
        let periods = accrual_periods(start, end, 3, DayCountConvention::Act360).unwrap();
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].end, Date::from_ymd(2025, 4, 15).unwrap());
        assert!(periods[0].fraction < 0.25);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let d = Date::from_ymd(2025, 1, 15).unwrap();
        assert!(accrual_periods(d, d, 3, DayCountConvention::Act360).is_err());
        assert!(accrual_periods(d, d.add_years(1).unwrap(), 0, DayCountConvention::Act360).is_err());
    }
}
