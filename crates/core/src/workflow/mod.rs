//! Journal posting workflow for Tally.
//!
//! This module implements the journal lifecycle state machine, approval
//! rules engine, posting orchestration, and reversal operations.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (WorkflowAction)
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic
//! - `approval` - Approval rules engine
//! - `posting` - Posting orchestration and the store boundary
//! - `reversal` - Reversing journal creation

pub mod approval;
pub mod error;
pub mod posting;
pub mod reversal;
pub mod service;
pub mod types;

#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod service_props;

pub use approval::{ApprovalEngine, ApprovalRule, ApproverRole};
pub use error::WorkflowError;
pub use posting::{PostingEngine, PostingStore, StoreError};
pub use reversal::ReversalService;
pub use service::WorkflowService;
pub use types::WorkflowAction;
