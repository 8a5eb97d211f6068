//! Core ledger engine for Tally.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; persistence and transport are collaborators injected at the
//! boundary.
//!
//! # Modules
//!
//! - `accounts` - Tenant-scoped chart of accounts and normal balances
//! - `fiscal` - Fiscal years, periods, and posting locks
//! - `journal` - Journal documents and balance validation
//! - `workflow` - Posting lifecycle state machine and reversal
//! - `projector` - Running balances and trial balance projection
//! - `allocation` - Payment-to-invoice allocation validation
//! - `documents` - Invoice/payment reduction to journal lines
//! - `depreciation` - Depreciation schedules and posting

pub mod accounts;
pub mod allocation;
pub mod depreciation;
pub mod documents;
pub mod fiscal;
pub mod journal;
pub mod projector;
pub mod workflow;
