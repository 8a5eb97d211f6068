//! Payment reduction to journal lines.
//!
//! A payment reduces to a debit of cash against credits of the
//! receivable control account, one per validated allocation. The
//! unapplied remainder, if any, credits a dedicated account so the
//! posting always balances against the full payment amount.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_shared::types::{AccountId, JournalId, Money, PaymentId, TenantId, UserId};

use crate::allocation::{AllocationValidation, PaymentAllocation};
use crate::journal::{Journal, JournalLine, JournalStatus, JournalType};

use super::error::DocumentError;

/// Accounts a payment posts against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaymentAccounts {
    /// Cash or bank account receiving the funds.
    pub cash: AccountId,
    /// Receivable control account relieved by the allocations.
    pub receivable: AccountId,
    /// Liability account holding any unapplied remainder.
    pub unapplied: AccountId,
}

/// A customer payment applied against invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The payment date.
    pub payment_date: NaiveDate,
    /// The amount received.
    pub amount: Money,
    /// Exchange rate to the tenant's base currency.
    pub exchange_rate: Decimal,
    /// Workflow status; payments follow the journal lifecycle.
    pub status: JournalStatus,
    /// Who recorded the payment.
    pub created_by: UserId,
    /// How the payment is applied across invoices.
    pub allocations: Vec<PaymentAllocation>,
}

impl Payment {
    /// Reduce the payment to balanced journal lines.
    ///
    /// Requires the [`AllocationValidation`] produced by a successful
    /// allocation check for this payment, so unvalidated allocation sets
    /// cannot reach the journal pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] for a non-positive payment amount or
    /// failed arithmetic.
    pub fn to_journal_lines(
        &self,
        accounts: PaymentAccounts,
        validation: &AllocationValidation,
    ) -> Result<Vec<JournalLine>, DocumentError> {
        if !self.amount.is_positive() {
            return Err(DocumentError::NonPositivePayment);
        }

        let mut lines = Vec::with_capacity(self.allocations.len() + 2);
        lines.push(JournalLine::debit(1, accounts.cash, self.amount));

        let mut line_number = 2;
        for allocation in &self.allocations {
            lines.push(JournalLine::credit(
                line_number,
                accounts.receivable,
                allocation.amount,
            ));
            line_number += 1;
        }

        if validation.remaining_amount.is_positive() {
            lines.push(JournalLine::credit(
                line_number,
                accounts.unapplied,
                validation.remaining_amount,
            ));
        }
        Ok(lines)
    }

    /// Build the draft journal this payment posts through.
    ///
    /// # Errors
    ///
    /// See [`Payment::to_journal_lines`].
    pub fn to_draft_journal(
        &self,
        accounts: PaymentAccounts,
        validation: &AllocationValidation,
    ) -> Result<Journal, DocumentError> {
        let lines = self.to_journal_lines(accounts, validation)?;
        Ok(Journal {
            id: JournalId::new(),
            tenant_id: self.tenant_id,
            journal_type: JournalType::Receipt,
            transaction_date: self.payment_date,
            posting_date: None,
            currency: self.amount.currency(),
            exchange_rate: self.exchange_rate,
            description: format!("Payment {}", self.id),
            status: JournalStatus::Draft,
            created_by: self.created_by,
            lines,
        })
    }
}
