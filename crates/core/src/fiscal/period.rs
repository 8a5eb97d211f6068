//! Fiscal period types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::{FiscalPeriodId, FiscalYearId, TenantId};

/// Fiscal year definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Unique identifier.
    pub id: FiscalYearId,
    /// Tenant this fiscal year belongs to.
    pub tenant_id: TenantId,
    /// Year name (e.g., "FY2026").
    pub name: String,
    /// Start date of the fiscal year.
    pub start_date: NaiveDate,
    /// End date of the fiscal year.
    pub end_date: NaiveDate,
    /// Whether the whole year is locked against posting.
    pub is_locked: bool,
}

/// A fiscal period within a fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Unique identifier.
    pub id: FiscalPeriodId,
    /// Fiscal year this period belongs to.
    pub fiscal_year_id: FiscalYearId,
    /// Period number within the year (1-12 for monthly).
    pub period_number: u8,
    /// Period name (e.g., "January 2026").
    pub name: String,
    /// Start date of the period.
    pub start_date: NaiveDate,
    /// End date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Whether this period is locked against posting.
    pub is_locked: bool,
}

impl FiscalPeriod {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the period length in days (inclusive of both ends).
    #[must_use]
    pub fn length_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
