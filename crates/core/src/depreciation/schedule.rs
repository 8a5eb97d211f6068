//! Depreciation schedule generation.
//!
//! Each run depreciates one asset over one period and carries its own
//! accumulated-before/after pair, capped at the depreciable base.
//! Schedules absorb the rounding remainder in the final period so the
//! lifetime total equals cost minus salvage exactly.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tally_shared::types::{AccountId, AssetId, JournalId, Money, MoneyError, TenantId, UserId};

use crate::journal::{Journal, JournalLine, JournalStatus, JournalType};

/// How an asset's cost is spread over its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Equal periodic amounts over the useful life.
    StraightLine,
    /// A fixed fraction of net book value per year.
    DecliningBalance {
        /// Annual rate as a fraction in (0, 1].
        rate: Decimal,
    },
}

/// A depreciable fixed asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier.
    pub id: AssetId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Human-facing name.
    pub name: String,
    /// Acquisition cost.
    pub cost: Money,
    /// Expected value at end of life; same currency as cost.
    pub salvage_value: Money,
    /// Useful life in whole years.
    pub useful_life_years: u32,
    /// Depreciation method.
    pub method: DepreciationMethod,
}

impl Asset {
    /// The total amount to depreciate over the asset's life.
    ///
    /// # Errors
    ///
    /// Returns `SalvageExceedsCost` when salvage is above cost, or a
    /// currency mismatch from the subtraction.
    pub fn depreciable_base(&self) -> Result<Money, DepreciationError> {
        if self
            .salvage_value
            .cmp_amount(self.cost)
            .map_err(DepreciationError::Money)?
            == std::cmp::Ordering::Greater
        {
            return Err(DepreciationError::SalvageExceedsCost {
                cost: self.cost,
                salvage: self.salvage_value,
            });
        }
        self.cost
            .checked_sub(self.salvage_value)
            .map_err(DepreciationError::Money)
    }
}

/// One period's depreciation for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationRun {
    /// The asset being depreciated.
    pub asset_id: AssetId,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period, inclusive.
    pub period_end: NaiveDate,
    /// The method used.
    pub method: DepreciationMethod,
    /// Depreciation charged this period.
    pub amount: Money,
    /// Accumulated depreciation before this run.
    pub accumulated_before: Money,
    /// Accumulated depreciation after this run.
    pub accumulated_after: Money,
}

/// Errors from depreciation scheduling.
#[derive(Debug, Error)]
pub enum DepreciationError {
    /// Useful life must be at least one year.
    #[error("Useful life must be at least one year, got {0}")]
    InvalidUsefulLife(u32),

    /// Salvage value exceeds cost.
    #[error("Salvage value {salvage} exceeds cost {cost}")]
    SalvageExceedsCost {
        /// Acquisition cost.
        cost: Money,
        /// Salvage value.
        salvage: Money,
    },

    /// Declining-balance rate outside (0, 1].
    #[error("Declining balance rate must be in (0, 1], got {0}")]
    InvalidRate(Decimal),

    /// The asset is already fully depreciated.
    #[error("Asset {0} is fully depreciated")]
    FullyDepreciated(AssetId),

    /// A run would push accumulated depreciation past the base.
    #[error("Run would accumulate {would_accumulate}, cap is {cap}")]
    CapExceeded {
        /// Accumulated after the offending run.
        would_accumulate: Money,
        /// The depreciable base.
        cap: Money,
    },

    /// The period dates are inverted.
    #[error("Period end {end} is before start {start}")]
    InvalidPeriod {
        /// First day.
        start: NaiveDate,
        /// Last day.
        end: NaiveDate,
    },

    /// Monetary arithmetic failed.
    #[error("Money arithmetic failed: {0}")]
    Money(#[from] MoneyError),
}

impl DepreciationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUsefulLife(_) => "INVALID_USEFUL_LIFE",
            Self::SalvageExceedsCost { .. } => "SALVAGE_EXCEEDS_COST",
            Self::InvalidRate(_) => "INVALID_DEPRECIATION_RATE",
            Self::FullyDepreciated(_) => "FULLY_DEPRECIATED",
            Self::CapExceeded { .. } => "DEPRECIATION_CAP_EXCEEDED",
            Self::InvalidPeriod { .. } => "INVALID_DEPRECIATION_PERIOD",
            Self::Money(_) => "MONEY_ARITHMETIC_FAILED",
        }
    }
}

/// Stateless depreciation scheduler.
pub struct DepreciationScheduler;

impl DepreciationScheduler {
    /// Generate the complete monthly straight-line schedule for an asset.
    ///
    /// Produces `useful_life_years × 12` runs of `base / months` each
    /// (half-up); the final run absorbs the rounding remainder so the
    /// lifetime total equals the depreciable base exactly.
    ///
    /// # Errors
    ///
    /// Returns a [`DepreciationError`] for an invalid life, inverted
    /// salvage/cost, or failed arithmetic.
    pub fn monthly_schedule(
        asset: &Asset,
        first_period_start: NaiveDate,
    ) -> Result<Vec<DepreciationRun>, DepreciationError> {
        if asset.useful_life_years == 0 {
            return Err(DepreciationError::InvalidUsefulLife(0));
        }
        let base = asset.depreciable_base()?;
        let months = asset.useful_life_years * 12;
        let monthly = Money::from_decimal_rounded(
            base.to_decimal() / Decimal::from(months),
            base.currency(),
        )?;

        let mut runs = Vec::with_capacity(months as usize);
        let mut accumulated = Money::zero(base.currency());
        let mut start = first_period_start;
        for month in 0..months {
            let next_start = start
                .checked_add_months(Months::new(1))
                .ok_or(DepreciationError::InvalidPeriod { start, end: start })?;
            let end = next_start
                .checked_sub_days(Days::new(1))
                .ok_or(DepreciationError::InvalidPeriod { start, end: start })?;

            let remaining = base.checked_sub(accumulated)?;
            let amount = if month == months - 1 {
                // Final period takes whatever keeps the lifetime total exact.
                remaining
            } else if monthly.minor_units() > remaining.minor_units() {
                remaining
            } else {
                monthly
            };
            let after = accumulated.checked_add(amount)?;
            runs.push(DepreciationRun {
                asset_id: asset.id,
                period_start: start,
                period_end: end,
                method: DepreciationMethod::StraightLine,
                amount,
                accumulated_before: accumulated,
                accumulated_after: after,
            });
            accumulated = after;
            start = next_start;
        }
        Ok(runs)
    }

    /// Depreciate one arbitrary period for an asset.
    ///
    /// Straight-line charges `annual × days / 365` (half-up); declining
    /// balance charges `net book value × rate × days / 365`. Either way
    /// the charge is capped at the remaining base.
    ///
    /// # Errors
    ///
    /// Returns `FullyDepreciated` when nothing remains, or another
    /// [`DepreciationError`] for invalid inputs.
    pub fn run_for_period(
        asset: &Asset,
        accumulated_before: Money,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<DepreciationRun, DepreciationError> {
        if asset.useful_life_years == 0 {
            return Err(DepreciationError::InvalidUsefulLife(0));
        }
        if period_end < period_start {
            return Err(DepreciationError::InvalidPeriod {
                start: period_start,
                end: period_end,
            });
        }
        let base = asset.depreciable_base()?;
        let remaining = base.checked_sub(accumulated_before)?;
        if !remaining.is_positive() {
            return Err(DepreciationError::FullyDepreciated(asset.id));
        }

        let days = Decimal::from(period_end.signed_duration_since(period_start).num_days() + 1);
        let year_fraction = days / Decimal::from(365);

        let uncapped = match asset.method {
            DepreciationMethod::StraightLine => {
                let annual = base.to_decimal() / Decimal::from(asset.useful_life_years);
                Money::from_decimal_rounded(annual * year_fraction, base.currency())?
            }
            DepreciationMethod::DecliningBalance { rate } => {
                if rate <= Decimal::ZERO || rate > Decimal::ONE {
                    return Err(DepreciationError::InvalidRate(rate));
                }
                let nbv = asset.cost.checked_sub(accumulated_before)?;
                Money::from_decimal_rounded(nbv.to_decimal() * rate * year_fraction, base.currency())?
            }
        };

        let amount = if uncapped.minor_units() > remaining.minor_units() {
            remaining
        } else {
            uncapped
        };
        let accumulated_after = accumulated_before.checked_add(amount)?;
        Ok(DepreciationRun {
            asset_id: asset.id,
            period_start,
            period_end,
            method: asset.method,
            amount,
            accumulated_before,
            accumulated_after,
        })
    }

    /// Build the draft depreciation journal for a run: debit expense,
    /// credit accumulated depreciation, dated at period end.
    #[must_use]
    pub fn run_to_draft_journal(
        run: &DepreciationRun,
        tenant_id: TenantId,
        expense_account: AccountId,
        accumulated_account: AccountId,
        created_by: UserId,
    ) -> Journal {
        Journal {
            id: JournalId::new(),
            tenant_id,
            journal_type: JournalType::Depreciation,
            transaction_date: run.period_end,
            posting_date: None,
            currency: run.amount.currency(),
            exchange_rate: Decimal::ONE,
            description: format!(
                "Depreciation for asset {} ({} to {})",
                run.asset_id, run.period_start, run.period_end
            ),
            status: JournalStatus::Draft,
            created_by,
            lines: vec![
                JournalLine::debit(1, expense_account, run.amount),
                JournalLine::credit(2, accumulated_account, run.amount),
            ],
        }
    }
}
