//! Status transition service.
//!
//! Stateless: every method takes the journal's current status and returns
//! a [`WorkflowAction`] describing the transition, or a [`WorkflowError`]
//! when the transition is not allowed. The transition table is strictly
//! linear: draft → submitted → approved → posted → reversed.

use chrono::{NaiveDate, Utc};

use tally_shared::types::{JournalId, UserId};

use crate::journal::JournalStatus;

use super::error::WorkflowError;
use super::types::WorkflowAction;

/// Stateless service for journal status transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Returns true if the transition between the two statuses is allowed.
    #[must_use]
    pub const fn is_valid_transition(from: JournalStatus, to: JournalStatus) -> bool {
        matches!(
            (from, to),
            (JournalStatus::Draft, JournalStatus::Submitted)
                | (JournalStatus::Submitted, JournalStatus::Approved)
                | (JournalStatus::Approved, JournalStatus::Posted)
                | (JournalStatus::Posted, JournalStatus::Reversed)
        )
    }

    /// Submit a draft journal for approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the journal is not in draft.
    pub fn submit(
        current: JournalStatus,
        submitted_by: UserId,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_transition(current, JournalStatus::Submitted)?;
        Ok(WorkflowAction::Submit {
            new_status: JournalStatus::Submitted,
            submitted_by,
            submitted_at: Utc::now(),
        })
    }

    /// Approve a submitted journal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the journal is not submitted.
    pub fn approve(
        current: JournalStatus,
        approved_by: UserId,
        notes: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_transition(current, JournalStatus::Approved)?;
        Ok(WorkflowAction::Approve {
            new_status: JournalStatus::Approved,
            approved_by,
            approved_at: Utc::now(),
            notes,
        })
    }

    /// Post an approved journal to the ledger.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the journal is not approved.
    pub fn post(
        current: JournalStatus,
        posted_by: UserId,
        sequence_base: i64,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::check_transition(current, JournalStatus::Posted)?;
        Ok(WorkflowAction::Post {
            new_status: JournalStatus::Posted,
            posted_by,
            posted_at: Utc::now(),
            sequence_base,
        })
    }

    /// Reverse a posted journal. A non-empty reason is required.
    ///
    /// # Errors
    ///
    /// Returns `ReversalReasonRequired` if the reason is blank, or
    /// `InvalidTransition` if the journal is not posted.
    pub fn reverse(
        current: JournalStatus,
        reversed_by: UserId,
        reversal_date: NaiveDate,
        reversing_journal_id: JournalId,
        reason: &str,
    ) -> Result<WorkflowAction, WorkflowError> {
        if reason.trim().is_empty() {
            return Err(WorkflowError::ReversalReasonRequired);
        }
        Self::check_transition(current, JournalStatus::Reversed)?;
        Ok(WorkflowAction::Reverse {
            new_status: JournalStatus::Reversed,
            reversed_by,
            reversed_at: Utc::now(),
            reversal_date,
            reversing_journal_id,
            reason: reason.trim().to_string(),
        })
    }

    /// Check that a journal in the given status may still be edited.
    ///
    /// Lines and header fields are editable in draft only; pulling a
    /// submitted or approved journal back requires a rejection flow, not
    /// an in-place edit.
    ///
    /// # Errors
    ///
    /// Returns `CannotModifyPosted` or `CannotModifyReversed` for the
    /// immutable statuses, and `NotEditable` for submitted and approved.
    pub const fn validate_can_modify(current: JournalStatus) -> Result<(), WorkflowError> {
        match current {
            JournalStatus::Draft => Ok(()),
            JournalStatus::Posted => Err(WorkflowError::CannotModifyPosted),
            JournalStatus::Reversed => Err(WorkflowError::CannotModifyReversed),
            JournalStatus::Submitted | JournalStatus::Approved => {
                Err(WorkflowError::NotEditable { status: current })
            }
        }
    }

    const fn check_transition(
        from: JournalStatus,
        to: JournalStatus,
    ) -> Result<(), WorkflowError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition { from, to })
        }
    }
}
