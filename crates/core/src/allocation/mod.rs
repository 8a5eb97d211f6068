//! Payment-to-invoice allocation for Tally.
//!
//! # Modules
//!
//! - `validator` - Atomic validation of payment allocation batches

pub mod validator;

#[cfg(test)]
mod validator_props;

pub use validator::{
    AllocationError, AllocationValidation, AllocationValidator, PaymentAllocation,
};
