//! Date-to-period resolution and lock state.
//!
//! The calendar owns a tenant's fiscal years and their periods. Periods
//! within a year must be contiguous and non-overlapping, so any date
//! resolves to at most one period.

use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

use tally_shared::types::{FiscalPeriodId, FiscalYearId, TenantId};

use super::period::{FiscalPeriod, FiscalYear};

/// Errors that can occur during fiscal calendar operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FiscalError {
    /// No period covers the given date.
    #[error("No open fiscal period for date {0}")]
    NoOpenPeriod(NaiveDate),

    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    UnknownFiscalYear(FiscalYearId),

    /// Fiscal period not found.
    #[error("Fiscal period not found: {0}")]
    UnknownPeriod(FiscalPeriodId),

    /// Period number is outside 1..=12.
    #[error("Period number {0} is outside 1..=12")]
    InvalidPeriodNumber(u8),

    /// Two periods in one year carry the same number.
    #[error("Duplicate period number {0} within fiscal year")]
    DuplicatePeriodNumber(u8),

    /// Two periods in one year overlap in dates.
    #[error("Periods {first} and {second} overlap")]
    OverlappingPeriods {
        /// Number of the earlier period.
        first: u8,
        /// Number of the later period.
        second: u8,
    },

    /// A gap exists between consecutive periods.
    #[error("Gap between periods {first} and {second}")]
    NonContiguousPeriods {
        /// Number of the earlier period.
        first: u8,
        /// Number of the later period.
        second: u8,
    },

    /// A period lies outside the bounds of its fiscal year.
    #[error("Period {0} lies outside its fiscal year")]
    PeriodOutsideYear(u8),
}

impl FiscalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoOpenPeriod(_) => "NO_OPEN_PERIOD",
            Self::UnknownFiscalYear(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::UnknownPeriod(_) => "FISCAL_PERIOD_NOT_FOUND",
            Self::InvalidPeriodNumber(_) => "INVALID_PERIOD_NUMBER",
            Self::DuplicatePeriodNumber(_) => "DUPLICATE_PERIOD_NUMBER",
            Self::OverlappingPeriods { .. } => "OVERLAPPING_PERIODS",
            Self::NonContiguousPeriods { .. } => "NON_CONTIGUOUS_PERIODS",
            Self::PeriodOutsideYear(_) => "PERIOD_OUTSIDE_YEAR",
        }
    }
}

/// A tenant's fiscal calendar.
#[derive(Debug, Clone)]
pub struct FiscalCalendar {
    tenant_id: TenantId,
    years: HashMap<FiscalYearId, FiscalYear>,
    /// Periods sorted by start date across all years.
    periods: Vec<FiscalPeriod>,
}

impl FiscalCalendar {
    /// Creates an empty calendar for a tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            years: HashMap::new(),
            periods: Vec::new(),
        }
    }

    /// Returns the tenant this calendar belongs to.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Adds a fiscal year together with its periods.
    ///
    /// Periods must carry numbers 1..=12 with no duplicates, lie within the
    /// year's bounds, and be contiguous and non-overlapping in period-number
    /// order.
    ///
    /// # Errors
    ///
    /// Returns the first structural violation found; nothing is added on
    /// failure.
    pub fn add_year(
        &mut self,
        year: FiscalYear,
        mut periods: Vec<FiscalPeriod>,
    ) -> Result<(), FiscalError> {
        periods.sort_by_key(|p| p.period_number);
        Self::validate_periods(&year, &periods)?;

        self.years.insert(year.id, year);
        self.periods.extend(periods);
        self.periods.sort_by_key(|p| p.start_date);
        Ok(())
    }

    fn validate_periods(year: &FiscalYear, periods: &[FiscalPeriod]) -> Result<(), FiscalError> {
        for period in periods {
            if period.period_number < 1 || period.period_number > 12 {
                return Err(FiscalError::InvalidPeriodNumber(period.period_number));
            }
            if period.start_date < year.start_date || period.end_date > year.end_date {
                return Err(FiscalError::PeriodOutsideYear(period.period_number));
            }
        }
        for pair in periods.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.period_number == next.period_number {
                return Err(FiscalError::DuplicatePeriodNumber(prev.period_number));
            }
            if next.start_date <= prev.end_date {
                return Err(FiscalError::OverlappingPeriods {
                    first: prev.period_number,
                    second: next.period_number,
                });
            }
            let expected_start = prev
                .end_date
                .succ_opt()
                .ok_or(FiscalError::PeriodOutsideYear(prev.period_number))?;
            if next.start_date != expected_start {
                return Err(FiscalError::NonContiguousPeriods {
                    first: prev.period_number,
                    second: next.period_number,
                });
            }
        }
        Ok(())
    }

    /// Resolves the fiscal period covering a date.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenPeriod` if no period covers the date.
    pub fn period_for_date(&self, date: NaiveDate) -> Result<&FiscalPeriod, FiscalError> {
        self.periods
            .iter()
            .find(|p| p.contains_date(date))
            .ok_or(FiscalError::NoOpenPeriod(date))
    }

    /// Returns true if a period is locked, either directly or through its
    /// fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPeriod` if the id is unknown.
    pub fn is_locked(&self, period_id: FiscalPeriodId) -> Result<bool, FiscalError> {
        let period = self
            .periods
            .iter()
            .find(|p| p.id == period_id)
            .ok_or(FiscalError::UnknownPeriod(period_id))?;
        let year_locked = self
            .years
            .get(&period.fiscal_year_id)
            .is_some_and(|y| y.is_locked);
        Ok(period.is_locked || year_locked)
    }

    /// Locks or unlocks a period.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPeriod` if the id is unknown.
    pub fn set_period_locked(
        &mut self,
        period_id: FiscalPeriodId,
        locked: bool,
    ) -> Result<(), FiscalError> {
        let period = self
            .periods
            .iter_mut()
            .find(|p| p.id == period_id)
            .ok_or(FiscalError::UnknownPeriod(period_id))?;
        period.is_locked = locked;
        Ok(())
    }

    /// Locks a fiscal year, which locks all of its periods.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFiscalYear` if the id is unknown.
    pub fn lock_year(&mut self, year_id: FiscalYearId) -> Result<(), FiscalError> {
        let year = self
            .years
            .get_mut(&year_id)
            .ok_or(FiscalError::UnknownFiscalYear(year_id))?;
        year.is_locked = true;
        Ok(())
    }
}
