//! Balance projection for Tally.
//!
//! Balances are projections over posted lines, not stored state. This
//! module folds posted lines into per-account, per-currency balances,
//! running balance chains, and trial balances.
//!
//! # Modules
//!
//! - `balance` - Posted lines, balance projection, trial balance

pub mod balance;

#[cfg(test)]
mod balance_props;

pub use balance::{
    AccountBalance, BalanceProjector, PostedLine, RunningBalance, TrialBalanceRow,
};
