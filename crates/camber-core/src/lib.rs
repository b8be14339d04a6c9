//! # Camber Core
//!
//! Foundational types shared by the Camber curve framework:
//!
//! - **Dates**: [`Date`], a calendar date newtype over `chrono::NaiveDate`
//! - **Periods**: [`Period`], market tenor strings such as `ON`, `1W`, `3M`, `5Y`
//! - **Day counts**: [`DayCountConvention`] for time-axis and accrual fractions
//! - **Currencies**: ISO 4217 [`Currency`] codes
//!
//! Business-day calendars and schedule generation are not provided here;
//! products consuming these types own their own conventions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::DayCountConvention;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Currency, Date, Period, TimeUnit};
}

pub use daycounts::DayCountConvention;
pub use error::{CoreError, CoreResult};
pub use types::{Currency, Date, Period, TimeUnit};
