//! Tenant-scoped chart of accounts.
//!
//! This module implements the account registry:
//! - Account types and derived normal balances
//! - Tenant-scoped resolution with active checks
//! - Parent/child hierarchy with bounded cycle detection
//!
//! # Modules
//!
//! - `account` - Account domain types
//! - `chart` - The account arena and hierarchy validation
//! - `error` - Account-specific error types

pub mod account;
pub mod chart;
pub mod error;

pub use account::{Account, AccountType, NormalBalance};
pub use chart::ChartOfAccounts;
pub use error::AccountError;
