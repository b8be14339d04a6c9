//! Shared curve handles.
//!
//! Parent curves (a discount curve used by many credit curves, two FX legs
//! used by a cross) are shared through [`CurveHandle`]: a cheap clone of an
//! `Arc<RwLock<CalibratedCurve>>` carrying a stable identity. Dependents read
//! their parents through the handle on every query, so refitting a parent is
//! visible immediately.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calibrated::CalibratedCurve;

/// Stable identity of a calibrated curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveId(Uuid);

impl CurveId {
    /// Creates a fresh random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CurveId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared, lockable reference to a calibrated curve.
///
/// Identity checks (`id()`) never take the lock, which is what lets
/// dependency walks detect self-references before locking anything.
#[derive(Clone)]
pub struct CurveHandle {
    id: CurveId,
    name: Arc<str>,
    inner: Arc<RwLock<CalibratedCurve>>,
}

impl CurveHandle {
    /// Wraps a curve in a new handle.
    #[must_use]
    pub fn new(curve: CalibratedCurve) -> Self {
        Self {
            id: curve.id(),
            name: Arc::from(curve.name()),
            inner: Arc::new(RwLock::new(curve)),
        }
    }

    /// Identity of the wrapped curve.
    pub fn id(&self) -> CurveId {
        self.id
    }

    /// Name of the wrapped curve.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locks the curve for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, CalibratedCurve> {
        self.inner.read()
    }

    /// Locks the curve for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, CalibratedCurve> {
        self.inner.write()
    }

    /// Returns true if both handles refer to the same curve.
    pub fn same_curve(&self, other: &CurveHandle) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for CurveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
