//! Dated point curve.
//!
//! A [`Curve`] is the storage layer of the framework: a sorted, unique
//! sequence of `(date, value)` points plus the interpolation and
//! extrapolation rules used to answer queries between and beyond them.
//! It knows nothing about what the values mean; interpolator strategies
//! give them a meaning (discount factor, survival probability, basis, ...).

use camber_core::{Date, DayCountConvention};
use camber_math::interpolation::{self, ExtrapolationMethod, InterpolationMethod};

use crate::error::{CurveError, CurveResult};

/// Sorted `(date, value)` points with interpolation rules.
///
/// Points are kept strictly increasing by date; inserting at an existing
/// date replaces the value. Times fed to the interpolation kernel are year
/// fractions under the curve's day count, measured from the as-of date or,
/// with [`Curve::with_relative_time`], from the first point.
///
/// # Example
///
/// ```rust
/// use camber_core::Date;
/// use camber_curves::curve::Curve;
///
/// let as_of = Date::from_ymd(2025, 1, 2).unwrap();
/// let mut curve = Curve::new(as_of);
/// curve.set_point(as_of, 1.0).unwrap();
/// curve.set_point(as_of.add_years(1).unwrap(), 0.96).unwrap();
///
/// let df = curve.value(as_of.add_months(6).unwrap()).unwrap();
/// assert!(df < 1.0 && df > 0.96);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    as_of: Date,
    day_count: DayCountConvention,
    interpolation: InterpolationMethod,
    left: ExtrapolationMethod,
    right: ExtrapolationMethod,
    relative_time: bool,
    dates: Vec<Date>,
    values: Vec<f64>,
    times: Vec<f64>,
}

impl Curve {
    /// Creates an empty log-linear curve on ACT/365F with flat extrapolation.
    #[must_use]
    pub fn new(as_of: Date) -> Self {
        Self {
            as_of,
            day_count: DayCountConvention::Act365Fixed,
            interpolation: InterpolationMethod::LogLinear,
            left: ExtrapolationMethod::Flat,
            right: ExtrapolationMethod::Flat,
            relative_time: false,
            dates: Vec::new(),
            values: Vec::new(),
            times: Vec::new(),
        }
    }

    /// Sets the day count measuring the time axis.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self.refresh_times();
        self
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.interpolation = method;
        self
    }

    /// Sets left and right extrapolation.
    #[must_use]
    pub fn with_extrapolation(mut self, left: ExtrapolationMethod, right: ExtrapolationMethod) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Measures time from the first point instead of the as-of date.
    #[must_use]
    pub fn with_relative_time(mut self, relative: bool) -> Self {
        self.relative_time = relative;
        self.refresh_times();
        self
    }

    /// Returns the as-of date.
    pub fn as_of(&self) -> Date {
        self.as_of
    }

    /// Returns the day count of the time axis.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the interpolation method.
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Returns `(left, right)` extrapolation.
    pub fn extrapolation(&self) -> (ExtrapolationMethod, ExtrapolationMethod) {
        (self.left, self.right)
    }

    /// Returns true if time is measured from the first point.
    pub fn is_relative_time(&self) -> bool {
        self.relative_time
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Point dates in increasing order.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Point values, aligned with [`Curve::dates`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Point times, aligned with [`Curve::dates`].
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Iterates over `(date, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Value stored exactly at `date`, if any.
    pub fn point_at(&self, date: Date) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|i| self.values[i])
    }

    /// Inserts a point, replacing any value already stored at `date`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a non-finite value.
    pub fn set_point(&mut self, date: Date, value: f64) -> CurveResult<()> {
        if !value.is_finite() {
            return Err(CurveError::validation(format!(
                "non-finite curve value {value} at {date}"
            )));
        }
        match self.dates.binary_search(&date) {
            Ok(i) => self.values[i] = value,
            Err(i) => {
                self.dates.insert(i, date);
                self.values.insert(i, value);
                if self.relative_time && i == 0 {
                    self.refresh_times();
                } else {
                    let t = self.time(date);
                    self.times.insert(i, t);
                }
            }
        }
        Ok(())
    }

    /// Removes the point at `date`, returning its value.
    pub fn remove_point(&mut self, date: Date) -> Option<f64> {
        let i = self.dates.binary_search(&date).ok()?;
        self.dates.remove(i);
        self.times.remove(i);
        let value = self.values.remove(i);
        if self.relative_time && i == 0 {
            self.refresh_times();
        }
        Some(value)
    }

    /// Removes every point.
    pub fn clear(&mut self) {
        self.dates.clear();
        self.values.clear();
        self.times.clear();
    }

    /// Removes every point dated on or after `date`.
    pub fn truncate_from(&mut self, date: Date) {
        let keep = self.dates.partition_point(|d| *d < date);
        self.dates.truncate(keep);
        self.values.truncate(keep);
        self.times.truncate(keep);
    }

    /// Year fraction of `date` on the curve's time axis.
    pub fn time(&self, date: Date) -> f64 {
        let origin = if self.relative_time {
            self.dates.first().copied().unwrap_or(self.as_of)
        } else {
            self.as_of
        };
        self.day_count.year_fraction(origin, date)
    }

    /// Interpolated value at `date`.
    ///
    /// Dates before the first point or after the last one use the curve's
    /// extrapolation rules rather than failing.
    ///
    /// # Errors
    ///
    /// Fails on an empty curve or when extrapolation is disabled.
    pub fn value(&self, date: Date) -> CurveResult<f64> {
        let value = interpolation::value_at(
            self.interpolation,
            self.left,
            self.right,
            &self.times,
            &self.values,
            self.time(date),
        )?;
        Ok(value)
    }

    /// Ratio `value(end) / value(start)`.
    ///
    /// # Errors
    ///
    /// Fails if either value cannot be computed or the start value is zero.
    pub fn value_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        let v0 = self.value(start)?;
        if v0 == 0.0 {
            return Err(CurveError::domain(format!(
                "curve value is zero at {start}, ratio undefined"
            )));
        }
        Ok(self.value(end)? / v0)
    }

    fn refresh_times(&mut self) {
        self.times = self.dates.iter().map(|d| self.time(*d)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn as_of() -> Date {
        Date::from_ymd(2025, 1, 2).unwrap()
    }

    fn sample() -> Curve {
        let d = as_of();
        let mut curve = Curve::new(d);
        curve.set_point(d.add_years(2).unwrap(), 0.92).unwrap();
        curve.set_point(d, 1.0).unwrap();
        curve.set_point(d.add_years(1).unwrap(), 0.96).unwrap();
        curve
    }

    #[test]
    fn test_points_stay_sorted_and_unique() {
        let mut curve = sample();
        assert_eq!(curve.len(), 3);
        assert!(curve.dates().windows(2).all(|w| w[0] < w[1]));

        curve.set_point(as_of().add_years(1).unwrap(), 0.95).unwrap();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.point_at(as_of().add_years(1).unwrap()), Some(0.95));
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut curve = sample();
        assert!(curve.set_point(as_of(), f64::NAN).is_err());
        assert_eq!(curve.len(), 3);
    }

    #[test]
    fn test_value_interpolates_and_extrapolates() {
        let curve = sample();
        let one_year = as_of().add_years(1).unwrap();
        assert_relative_eq!(curve.value(one_year).unwrap(), 0.96, epsilon = 1e-14);

        // before the first point: flat
        assert_relative_eq!(curve.value(as_of() - 10).unwrap(), 1.0);
        // after the last point: flat
        assert_relative_eq!(curve.value(as_of().add_years(5).unwrap()).unwrap(), 0.92);
    }

    #[test]
    fn test_extrapolation_none_fails() {
        let curve = sample().with_extrapolation(ExtrapolationMethod::Flat, ExtrapolationMethod::None);
        assert!(curve.value(as_of().add_years(3).unwrap()).is_err());
        assert!(curve.value(as_of() - 1).is_ok());
    }

    #[test]
    fn test_value_between_is_ratio() {
        let curve = sample();
        let d1 = as_of().add_years(1).unwrap();
        let d2 = as_of().add_years(2).unwrap();
        assert_relative_eq!(curve.value_between(d1, d2).unwrap(), 0.92 / 0.96, epsilon = 1e-14);
    }

    #[test]
    fn test_truncate_from() {
        let mut curve = sample();
        curve.truncate_from(as_of().add_years(1).unwrap());
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.dates()[0], as_of());
        assert_eq!(curve.times().len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut curve = sample();
        assert_eq!(curve.remove_point(as_of()), Some(1.0));
        assert_eq!(curve.remove_point(as_of()), None);
        curve.clear();
        assert!(curve.is_empty());
        assert!(curve.value(as_of()).is_err());
    }

    #[test]
    fn test_relative_time_axis() {
        let start = as_of().add_years(1).unwrap();
        let mut curve = Curve::new(as_of()).with_relative_time(true);
        curve.set_point(start.add_years(1).unwrap(), 2.0).unwrap();
        curve.set_point(start, 1.0).unwrap();
        assert_relative_eq!(curve.times()[0], 0.0);
        assert_relative_eq!(curve.time(start.add_years(1).unwrap()), curve.times()[1]);
    }
}
