//! Ordered tenor container.
//!
//! A [`TenorSet`] keeps tenors in insertion order until [`TenorSet::sort`]
//! is called; nothing else reorders them. Bootstrapping and
//! refit-from-index rely on the sorted order.

use camber_core::Date;

use crate::error::{CurveError, CurveResult};
use crate::tenor::Tenor;

/// Tenors of one calibrated curve.
#[derive(Debug, Clone, Default)]
pub struct TenorSet {
    tenors: Vec<Tenor>,
}

impl TenorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from tenors in the given order.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if two tenors share a curve date.
    pub fn from_tenors(tenors: impl IntoIterator<Item = Tenor>) -> CurveResult<Self> {
        let mut set = Self::new();
        for tenor in tenors {
            set.add(tenor)?;
        }
        Ok(set)
    }

    /// Appends a tenor.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if a tenor already owns the same
    /// curve date, since both would solve the same curve point.
    pub fn add(&mut self, tenor: Tenor) -> CurveResult<()> {
        if let Some(existing) = self.tenors.iter().find(|t| t.curve_date() == tenor.curve_date()) {
            return Err(CurveError::validation(format!(
                "tenor '{}' and '{}' share curve date {}",
                existing.name(),
                tenor.name(),
                tenor.curve_date()
            )));
        }
        self.tenors.push(tenor);
        Ok(())
    }

    /// Number of tenors.
    pub fn len(&self) -> usize {
        self.tenors.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tenors.is_empty()
    }

    /// Tenor at `index`.
    pub fn get(&self, index: usize) -> Option<&Tenor> {
        self.tenors.get(index)
    }

    /// Mutable tenor at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tenor> {
        self.tenors.get_mut(index)
    }

    /// Iterates in current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tenor> {
        self.tenors.iter()
    }

    /// Iterates mutably in current order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tenor> {
        self.tenors.iter_mut()
    }

    /// Position of the first tenor named `name`, ignoring case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.tenors
            .iter()
            .position(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Returns true if a tenor named `name` exists, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// First tenor named `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Tenor> {
        self.index_of(name).map(|i| &self.tenors[i])
    }

    /// Removes the first tenor named `name`.
    pub fn remove_by_name(&mut self, name: &str) -> Option<Tenor> {
        let index = self.index_of(name)?;
        Some(self.tenors.remove(index))
    }

    /// Removes the tenor maturing on `maturity`.
    pub fn remove_by_date(&mut self, maturity: Date) -> Option<Tenor> {
        let index = self.tenors.iter().position(|t| t.maturity() == maturity)?;
        Some(self.tenors.remove(index))
    }

    /// Removes every tenor maturing after `date`, returning how many went.
    pub fn remove_maturing_after(&mut self, date: Date) -> usize {
        let before = self.tenors.len();
        self.tenors.retain(|t| t.maturity() <= date);
        before - self.tenors.len()
    }

    /// Binary search by maturity. Only meaningful on a sorted set.
    ///
    /// Returns `Ok(index)` of a tenor maturing on `maturity`, or
    /// `Err(index)` where such a tenor would be inserted.
    pub fn binary_search(&self, maturity: Date) -> Result<usize, usize> {
        self.tenors.binary_search_by(|t| t.maturity().cmp(&maturity))
    }

    /// Sorts by maturity, then curve date. The sort is stable.
    pub fn sort(&mut self) {
        self.tenors
            .sort_by(|a, b| (a.maturity(), a.curve_date()).cmp(&(b.maturity(), b.curve_date())));
    }

    /// Returns true if maturities are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.tenors.windows(2).all(|w| w[0].maturity() <= w[1].maturity())
    }

    /// Restores every tenor's snapshotted quote.
    pub fn reset_quotes(&mut self) -> CurveResult<()> {
        self.tenors.iter_mut().try_for_each(Tenor::reset_quote)
    }

    /// Snapshots every tenor's current quote.
    pub fn commit_quotes(&mut self) {
        self.tenors.iter_mut().for_each(Tenor::commit_quote);
    }
}

impl<'a> IntoIterator for &'a TenorSet {
    type Item = &'a Tenor;
    type IntoIter = std::slice::Iter<'a, Tenor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tenors.iter()
    }
}
