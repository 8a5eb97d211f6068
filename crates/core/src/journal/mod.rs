//! Journal documents and balance validation.
//!
//! This module implements the double-entry journal:
//! - Journal header and line types
//! - Journal type and status enums
//! - Structural and per-currency balance validation
//!
//! # Modules
//!
//! - `types` - Journal domain types
//! - `validation` - Business rule validation for journal lines

pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use types::{Journal, JournalLine, JournalStatus, JournalType};
pub use validation::{validate_lines, JournalValidationError, ValidationResult};
