//! Reversal service for posted journals.
//!
//! A posted journal is never mutated or deleted. Reversing it creates a
//! new draft journal whose lines mirror the original with debits and
//! credits swapped, so the pair nets to zero on every affected account.

use chrono::NaiveDate;

use tally_shared::types::{JournalId, UserId};

use crate::journal::{Journal, JournalLine, JournalStatus};

/// Stateless service for building reversing journals.
pub struct ReversalService;

impl ReversalService {
    /// Create the draft reversing journal for a posted journal.
    ///
    /// For each original line:
    /// - Debits become credits
    /// - Credits become debits
    /// - Account, amounts, line numbers, and cost centers are preserved
    ///
    /// The reversing journal keeps the original's type and currency, is
    /// dated `reversal_date`, and starts in draft so it goes through the
    /// normal workflow before posting.
    #[must_use]
    pub fn create_reversing_journal(
        original: &Journal,
        reversal_date: NaiveDate,
        created_by: UserId,
        reason: &str,
    ) -> Journal {
        let lines: Vec<JournalLine> = original
            .lines
            .iter()
            .map(|line| {
                let mut reversed = line.clone();
                std::mem::swap(&mut reversed.debit, &mut reversed.credit);
                reversed
            })
            .collect();

        Journal {
            id: JournalId::new(),
            tenant_id: original.tenant_id,
            journal_type: original.journal_type,
            transaction_date: reversal_date,
            posting_date: None,
            currency: original.currency,
            exchange_rate: original.exchange_rate,
            description: format!(
                "Reversal of journal {}. Reason: {}",
                original.id, reason
            ),
            status: JournalStatus::Draft,
            created_by,
            lines,
        }
    }
}
