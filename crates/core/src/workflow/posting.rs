//! Posting engine: the single side-effecting path in the crate.
//!
//! [`PostingEngine`] orchestrates the full posting attempt: status check,
//! line validation, fiscal period resolution and lock check, then an
//! atomic hand-off to the caller's [`PostingStore`]. Every check runs
//! before the store is touched, so a failed attempt persists nothing and
//! the retryable error class can safely be retried from approved.

use rust_decimal::Decimal;
use tracing::{info, warn};

use tally_shared::types::{AccountId, UserId};

use crate::accounts::AccountError;
use crate::fiscal::FiscalCalendar;
use crate::journal::{validate_lines, Journal, JournalLine, JournalStatus};

use super::error::WorkflowError;
use super::reversal::ReversalService;
use super::service::WorkflowService;
use super::types::WorkflowAction;

/// Failures reported by a [`PostingStore`].
///
/// The store decides atomicity; the engine only maps its failures onto
/// workflow errors.
#[derive(Debug)]
pub enum StoreError {
    /// The store detected the target period was locked after the engine's
    /// pre-check (a lock/post race lost by the poster).
    PeriodLocked,
    /// The store timed out.
    Timeout(String),
    /// The store was unreachable.
    Unavailable(String),
}

/// Atomic persistence boundary for posted lines.
///
/// Implementations must persist all lines and the status change together
/// or not at all. Sequence numbers are `sequence_base`, `sequence_base + 1`,
/// ... in line-number order.
pub trait PostingStore {
    /// Persist the journal's lines as posted ledger rows.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when nothing was persisted.
    fn persist_posted_lines(
        &mut self,
        journal: &Journal,
        sequence_base: i64,
    ) -> Result<(), StoreError>;
}

/// Stateless orchestrator for the posting lifecycle.
pub struct PostingEngine;

impl PostingEngine {
    /// Submit a draft journal, validating its lines first.
    ///
    /// A journal that fails validation stays in draft.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for line defects, or `NotEditable` /
    /// `CannotModifyPosted` / `CannotModifyReversed` when the journal has
    /// already left draft.
    pub fn submit<A>(
        journal: &Journal,
        submitted_by: UserId,
        resolve_account: A,
    ) -> Result<WorkflowAction, WorkflowError>
    where
        A: FnMut(AccountId) -> Result<(), AccountError>,
    {
        WorkflowService::validate_can_modify(journal.status)?;
        validate_lines(&journal.lines, resolve_account)?;
        WorkflowService::submit(journal.status, submitted_by)
    }

    /// Post an approved journal through the given store.
    ///
    /// # Errors
    ///
    /// * `AlreadyPosted` / `InvalidTransition` for status defects
    /// * `Validation` when the lines no longer validate
    /// * `NoOpenPeriod` when no period covers the posting date
    /// * `PeriodLockedDuringPosting` when the period is locked, whether
    ///   detected up front or by the store mid-attempt
    /// * `StoreUnavailable` when the store times out or is unreachable
    pub fn post<A, S>(
        journal: &Journal,
        calendar: &FiscalCalendar,
        store: &mut S,
        posted_by: UserId,
        sequence_base: i64,
        resolve_account: A,
    ) -> Result<WorkflowAction, WorkflowError>
    where
        A: FnMut(AccountId) -> Result<(), AccountError>,
        S: PostingStore,
    {
        if journal.status == JournalStatus::Posted {
            return Err(WorkflowError::AlreadyPosted(journal.id));
        }
        if !WorkflowService::is_valid_transition(journal.status, JournalStatus::Posted) {
            return Err(WorkflowError::InvalidTransition {
                from: journal.status,
                to: JournalStatus::Posted,
            });
        }

        validate_lines(&journal.lines, resolve_account)?;

        let posting_date = journal.effective_posting_date();
        let period = calendar
            .period_for_date(posting_date)
            .map_err(|_| WorkflowError::NoOpenPeriod(posting_date))?;
        let period_id = period.id;
        if calendar
            .is_locked(period_id)
            .map_err(|_| WorkflowError::NoOpenPeriod(posting_date))?
        {
            warn!(
                journal_id = %journal.id,
                period_id = %period_id,
                "posting rejected, fiscal period locked"
            );
            return Err(WorkflowError::PeriodLockedDuringPosting { period_id });
        }

        store
            .persist_posted_lines(journal, sequence_base)
            .map_err(|err| match err {
                StoreError::PeriodLocked => {
                    warn!(
                        journal_id = %journal.id,
                        period_id = %period_id,
                        "posting lost lock race, nothing persisted"
                    );
                    WorkflowError::PeriodLockedDuringPosting { period_id }
                }
                StoreError::Timeout(msg) | StoreError::Unavailable(msg) => {
                    warn!(journal_id = %journal.id, error = %msg, "posting store failed");
                    WorkflowError::StoreUnavailable(msg)
                }
            })?;

        info!(
            journal_id = %journal.id,
            tenant_id = %journal.tenant_id,
            lines = journal.lines.len(),
            sequence_base,
            "journal posted"
        );
        WorkflowService::post(journal.status, posted_by, sequence_base)
    }

    /// Reverse a posted journal, producing the status action and the
    /// draft reversing journal.
    ///
    /// The reversal date must fall in an open, unlocked fiscal period; the
    /// original journal's period may already be locked.
    ///
    /// # Errors
    ///
    /// * `InvalidTransition` when the journal is not posted
    /// * `ReversalReasonRequired` when the reason is blank
    /// * `NoOpenPeriod` / `PeriodLockedDuringPosting` for the reversal date
    pub fn reverse(
        journal: &Journal,
        calendar: &FiscalCalendar,
        reversal_date: chrono::NaiveDate,
        reversed_by: UserId,
        reason: &str,
    ) -> Result<(WorkflowAction, Journal), WorkflowError> {
        if journal.status != JournalStatus::Posted {
            return Err(WorkflowError::InvalidTransition {
                from: journal.status,
                to: JournalStatus::Reversed,
            });
        }
        if reason.trim().is_empty() {
            return Err(WorkflowError::ReversalReasonRequired);
        }

        let period = calendar
            .period_for_date(reversal_date)
            .map_err(|_| WorkflowError::NoOpenPeriod(reversal_date))?;
        let period_id = period.id;
        if calendar
            .is_locked(period_id)
            .map_err(|_| WorkflowError::NoOpenPeriod(reversal_date))?
        {
            return Err(WorkflowError::PeriodLockedDuringPosting { period_id });
        }

        let reversing =
            ReversalService::create_reversing_journal(journal, reversal_date, reversed_by, reason);
        info!(
            journal_id = %journal.id,
            reversing_journal_id = %reversing.id,
            %reversal_date,
            "journal reversed"
        );
        let action = WorkflowService::reverse(
            journal.status,
            reversed_by,
            reversal_date,
            reversing.id,
            reason,
        )?;
        Ok((action, reversing))
    }

    /// The journal's total debits in functional currency, used for
    /// approval rule matching.
    #[must_use]
    pub fn functional_total(journal: &Journal) -> Decimal {
        journal
            .lines
            .iter()
            .filter(|line| line.is_debit())
            .map(Self::functional_amount)
            .sum()
    }

    fn functional_amount(line: &JournalLine) -> Decimal {
        let side = if line.is_debit() {
            line.debit
        } else {
            line.credit
        };
        side.to_decimal() * line.exchange_rate
    }
}
