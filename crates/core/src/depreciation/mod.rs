//! Depreciation scheduling for Tally.
//!
//! # Modules
//!
//! - `schedule` - Assets, depreciation runs, and schedule generation

pub mod schedule;

#[cfg(test)]
mod schedule_props;

pub use schedule::{
    Asset, DepreciationError, DepreciationMethod, DepreciationRun, DepreciationScheduler,
};
