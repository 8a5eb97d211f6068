//! Invoice reduction to journal lines.
//!
//! An invoice never posts directly: its line items reduce to a balanced
//! two-sided posting which then runs through the same validation and
//! workflow pipeline as a hand-entered journal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_shared::types::{AccountId, Currency, InvoiceId, JournalId, Money, TenantId, UserId};

use crate::journal::{Journal, JournalLine, JournalStatus, JournalType};

use super::error::DocumentError;

/// Whether the invoice bills a customer or records a supplier bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    /// Customer invoice: debit receivable, credit revenue and tax.
    Sales,
    /// Supplier bill: debit expense and tax, credit payable.
    Purchase,
}

/// One billed item on an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// What was billed.
    pub description: String,
    /// Billed quantity; fractional quantities are allowed.
    pub quantity: Decimal,
    /// Price per unit, in the invoice currency.
    pub unit_price: Money,
    /// Discount percentage applied to the gross amount (0..=100).
    pub discount_rate: Decimal,
    /// Tax percentage applied to the discounted net (0..=100).
    pub tax_rate: Decimal,
}

/// Accounts an invoice posts against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InvoiceAccounts {
    /// Receivable (sales) or payable (purchase) control account.
    pub control: AccountId,
    /// Revenue (sales) or expense (purchase) account.
    pub income: AccountId,
    /// Tax liability account.
    pub tax: AccountId,
}

/// Computed invoice totals in the invoice currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Net of all items after discount, before tax.
    pub net: Money,
    /// Total tax.
    pub tax: Money,
    /// Net plus tax; what the counterparty owes.
    pub total: Money,
}

/// A customer invoice or supplier bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Sales or purchase.
    pub kind: InvoiceKind,
    /// Human-facing invoice number.
    pub number: String,
    /// The invoice date.
    pub invoice_date: NaiveDate,
    /// The invoice currency; all items must match.
    pub currency: Currency,
    /// Exchange rate to the tenant's base currency.
    pub exchange_rate: Decimal,
    /// Workflow status; invoices follow the journal lifecycle.
    pub status: JournalStatus,
    /// Who created the invoice.
    pub created_by: UserId,
    /// The billed items.
    pub line_items: Vec<InvoiceLineItem>,
}

impl Invoice {
    /// Compute the invoice totals.
    ///
    /// Per item: gross = quantity × unit price (half-up), discount is a
    /// percentage of gross (half-up), tax is a percentage of the
    /// discounted net (half-up). Rounding happens per item, not over the
    /// summed totals, so the reduced lines always agree with what each
    /// item shows.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] for structural defects or failed
    /// arithmetic.
    pub fn totals(&self) -> Result<InvoiceTotals, DocumentError> {
        if self.line_items.is_empty() {
            return Err(DocumentError::NoLineItems);
        }

        let mut net = Money::zero(self.currency);
        let mut tax = Money::zero(self.currency);
        let hundred = Decimal::ONE_HUNDRED;

        for (index, item) in self.line_items.iter().enumerate() {
            let line_number = index as u32 + 1;
            if item.quantity <= Decimal::ZERO {
                return Err(DocumentError::NonPositiveQuantity { line_number });
            }
            if item.unit_price.currency() != self.currency {
                return Err(DocumentError::ItemCurrencyMismatch { line_number });
            }
            for rate in [item.discount_rate, item.tax_rate] {
                if rate < Decimal::ZERO || rate > hundred {
                    return Err(DocumentError::RateOutOfRange { line_number });
                }
            }

            let gross = item.unit_price.multiply_by_rate(item.quantity)?;
            let discount = gross.percent(item.discount_rate)?;
            let item_net = gross.checked_sub(discount)?;
            let item_tax = item_net.percent(item.tax_rate)?;

            net = net.checked_add(item_net)?;
            tax = tax.checked_add(item_tax)?;
        }

        let total = net.checked_add(tax)?;
        Ok(InvoiceTotals { net, tax, total })
    }

    /// Reduce the invoice to balanced journal lines.
    ///
    /// Sales: debit the control account for the total, credit revenue
    /// for net and tax liability for tax. Purchase mirrors the sides.
    /// The tax line is omitted when the tax total is zero.
    ///
    /// # Errors
    ///
    /// See [`Invoice::totals`].
    pub fn to_journal_lines(
        &self,
        accounts: InvoiceAccounts,
    ) -> Result<Vec<JournalLine>, DocumentError> {
        let totals = self.totals()?;

        let mut lines = Vec::with_capacity(3);
        match self.kind {
            InvoiceKind::Sales => {
                lines.push(JournalLine::debit(1, accounts.control, totals.total));
                lines.push(JournalLine::credit(2, accounts.income, totals.net));
                if !totals.tax.is_zero() {
                    lines.push(JournalLine::credit(3, accounts.tax, totals.tax));
                }
            }
            InvoiceKind::Purchase => {
                lines.push(JournalLine::debit(1, accounts.income, totals.net));
                if totals.tax.is_zero() {
                    lines.push(JournalLine::credit(2, accounts.control, totals.total));
                } else {
                    lines.push(JournalLine::debit(2, accounts.tax, totals.tax));
                    lines.push(JournalLine::credit(3, accounts.control, totals.total));
                }
            }
        }
        Ok(lines)
    }

    /// Build the draft journal this invoice posts through.
    ///
    /// # Errors
    ///
    /// See [`Invoice::totals`].
    pub fn to_draft_journal(&self, accounts: InvoiceAccounts) -> Result<Journal, DocumentError> {
        let lines = self.to_journal_lines(accounts)?;
        let journal_type = match self.kind {
            InvoiceKind::Sales => JournalType::Sales,
            InvoiceKind::Purchase => JournalType::Purchase,
        };
        Ok(Journal {
            id: JournalId::new(),
            tenant_id: self.tenant_id,
            journal_type,
            transaction_date: self.invoice_date,
            posting_date: None,
            currency: self.currency,
            exchange_rate: self.exchange_rate,
            description: format!("Invoice {}", self.number),
            status: JournalStatus::Draft,
            created_by: self.created_by,
            lines,
        })
    }
}
