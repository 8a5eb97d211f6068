//! Workflow action types.
//!
//! A [`WorkflowAction`] describes the outcome of a successful transition:
//! the new status plus the audit fields the caller should record. The
//! services in this module compute actions; persisting them is up to the
//! caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tally_shared::types::{JournalId, UserId};

use crate::journal::JournalStatus;

/// The result of a successful workflow transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Journal was submitted for approval.
    Submit {
        /// The new status (always `Submitted`).
        new_status: JournalStatus,
        /// Who submitted.
        submitted_by: UserId,
        /// When the submission happened.
        submitted_at: DateTime<Utc>,
    },
    /// Journal was approved.
    Approve {
        /// The new status (always `Approved`).
        new_status: JournalStatus,
        /// Who approved.
        approved_by: UserId,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
        /// Optional approval notes.
        notes: Option<String>,
    },
    /// Journal was posted to the ledger.
    Post {
        /// The new status (always `Posted`).
        new_status: JournalStatus,
        /// Who posted.
        posted_by: UserId,
        /// When the posting happened.
        posted_at: DateTime<Utc>,
        /// First posting sequence number assigned to the journal's lines.
        sequence_base: i64,
    },
    /// Journal was reversed by a new reversing journal.
    Reverse {
        /// The new status (always `Reversed`).
        new_status: JournalStatus,
        /// Who reversed.
        reversed_by: UserId,
        /// When the reversal happened.
        reversed_at: DateTime<Utc>,
        /// The date the reversing journal is dated.
        reversal_date: NaiveDate,
        /// The draft reversing journal created by the reversal.
        reversing_journal_id: JournalId,
        /// Why the journal was reversed.
        reason: String,
    },
}

impl WorkflowAction {
    /// Returns the status the journal should move to.
    #[must_use]
    pub const fn new_status(&self) -> JournalStatus {
        match self {
            Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Post { new_status, .. }
            | Self::Reverse { new_status, .. } => *new_status,
        }
    }
}
