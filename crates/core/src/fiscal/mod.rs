//! Fiscal year and period management.
//!
//! # Modules
//!
//! - `period` - Fiscal year and period domain types
//! - `calendar` - Date-to-period resolution and lock state

pub mod calendar;
pub mod period;

pub use calendar::{FiscalCalendar, FiscalError};
pub use period::{FiscalPeriod, FiscalYear};
