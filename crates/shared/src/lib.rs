//! Shared types for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Money in integer minor units with currency tagging
//! - Typed IDs for type-safe entity references

pub mod types;

pub use types::{Currency, Money, MoneyError};
