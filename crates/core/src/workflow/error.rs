//! Workflow error types for the posting lifecycle.
//!
//! This module defines all errors that can occur while moving a journal
//! through draft → submitted → approved → posted → reversed, including the
//! concurrency-class errors that are safe to retry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use tally_shared::types::{FiscalPeriodId, JournalId, UserId};

use crate::journal::{JournalStatus, JournalValidationError};

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: JournalStatus,
        /// The attempted target status.
        to: JournalStatus,
    },

    /// Attempted to edit a journal that has left draft.
    #[error("Journal in status {status} is not editable")]
    NotEditable {
        /// The journal's current status.
        status: JournalStatus,
    },

    /// Attempted to modify a posted journal.
    #[error("Cannot modify posted journal")]
    CannotModifyPosted,

    /// Attempted to modify a reversed journal.
    #[error("Cannot modify reversed journal")]
    CannotModifyReversed,

    /// The journal was already posted (double-posting attempt).
    #[error("Journal {0} is already posted")]
    AlreadyPosted(JournalId),

    /// The journal failed line validation.
    #[error("Journal validation failed: {0}")]
    Validation(#[from] JournalValidationError),

    /// No fiscal period covers the posting date.
    #[error("No open fiscal period for posting date {0}")]
    NoOpenPeriod(NaiveDate),

    /// The target fiscal period is locked; the posting attempt aborted
    /// without persisting anything.
    #[error("Fiscal period {period_id} locked during posting")]
    PeriodLockedDuringPosting {
        /// The locked period.
        period_id: FiscalPeriodId,
    },

    /// User is not authorized to approve the journal.
    #[error("User {user_id} is not authorized to approve this journal")]
    NotAuthorizedToApprove {
        /// The user who attempted to approve.
        user_id: UserId,
    },

    /// User's role does not meet the required approver role.
    #[error("User role {user_role} does not meet required role {required_role}")]
    InsufficientRole {
        /// The user's role.
        user_role: String,
        /// The required role for the operation.
        required_role: String,
    },

    /// The journal amount exceeds the approver's personal limit.
    #[error("Amount {amount} exceeds approval limit {limit}")]
    ExceedsApprovalLimit {
        /// The journal's functional total.
        amount: Decimal,
        /// The approver's limit.
        limit: Decimal,
    },

    /// No approval rule matched the journal.
    #[error("No approval rule found for journal type {journal_type} with amount {amount}")]
    NoApprovalRuleFound {
        /// The journal type.
        journal_type: String,
        /// The journal's functional total.
        amount: Decimal,
    },

    /// Reversal reason is required but not provided.
    #[error("Reversal reason is required")]
    ReversalReasonRequired,

    /// The backing store timed out or was unavailable; the whole posting
    /// attempt may be retried from approved.
    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),
}

impl WorkflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotEditable { .. } => "NOT_EDITABLE",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::CannotModifyReversed => "CANNOT_MODIFY_REVERSED",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::NoOpenPeriod(_) => "NO_OPEN_PERIOD",
            Self::PeriodLockedDuringPosting { .. } => "PERIOD_LOCKED_DURING_POSTING",
            Self::NotAuthorizedToApprove { .. } => "NOT_AUTHORIZED_TO_APPROVE",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::ExceedsApprovalLimit { .. } => "EXCEEDS_APPROVAL_LIMIT",
            Self::NoApprovalRuleFound { .. } => "NO_APPROVAL_RULE_FOUND",
            Self::ReversalReasonRequired => "REVERSAL_REASON_REQUIRED",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::NotEditable { .. }
            | Self::CannotModifyPosted
            | Self::CannotModifyReversed
            | Self::Validation(_)
            | Self::NoOpenPeriod(_)
            | Self::ReversalReasonRequired => 400,

            Self::NotAuthorizedToApprove { .. }
            | Self::InsufficientRole { .. }
            | Self::ExceedsApprovalLimit { .. } => 403,

            Self::NoApprovalRuleFound { .. } => 404,

            Self::AlreadyPosted(_) | Self::PeriodLockedDuringPosting { .. } => 409,

            Self::StoreUnavailable(_) => 503,
        }
    }

    /// Returns true if the whole posting attempt may safely be retried.
    ///
    /// Only the concurrency/environment class retries: nothing was
    /// persisted, so retrying from approved is safe.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PeriodLockedDuringPosting { .. } | Self::StoreUnavailable(_)
        )
    }
}
