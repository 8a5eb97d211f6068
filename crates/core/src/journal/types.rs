//! Journal domain types.
//!
//! A journal is the atomic double-entry document: a header plus an ordered
//! list of lines whose debits and credits must balance per currency before
//! the journal can be posted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_shared::types::{AccountId, CostCenterId, JournalId, Money, TenantId, UserId};

/// Journal type classification.
///
/// Categorizes journals for reporting and workflow purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalType {
    /// General journal entry.
    General,
    /// Sales invoice posting.
    Sales,
    /// Purchase/vendor bill posting.
    Purchase,
    /// Incoming payment (receipt).
    Receipt,
    /// Outgoing payment.
    Payment,
    /// Expense posting.
    Expense,
    /// Depreciation run posting.
    Depreciation,
    /// Adjustment entry.
    Adjustment,
    /// Opening balance entry.
    Opening,
    /// Closing entry.
    Closing,
}

impl JournalType {
    /// Returns the string representation of the journal type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::Receipt => "receipt",
            Self::Payment => "payment",
            Self::Expense => "expense",
            Self::Depreciation => "depreciation",
            Self::Adjustment => "adjustment",
            Self::Opening => "opening",
            Self::Closing => "closing",
        }
    }

    /// Parses a journal type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(Self::General),
            "sales" => Some(Self::Sales),
            "purchase" => Some(Self::Purchase),
            "receipt" => Some(Self::Receipt),
            "payment" => Some(Self::Payment),
            "expense" => Some(Self::Expense),
            "depreciation" => Some(Self::Depreciation),
            "adjustment" => Some(Self::Adjustment),
            "opening" => Some(Self::Opening),
            "closing" => Some(Self::Closing),
            _ => None,
        }
    }
}

impl fmt::Display for JournalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Journal status in the posting workflow.
///
/// Journals progress through these states strictly forward:
/// - Draft → Submitted (submit)
/// - Submitted → Approved (approve)
/// - Approved → Posted (post)
/// - Posted → Reversed (reverse)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Journal is being drafted and can be modified.
    Draft,
    /// Journal has been submitted for approval.
    Submitted,
    /// Journal has been approved and is ready for posting.
    Approved,
    /// Journal has been posted to the ledger (immutable).
    Posted,
    /// Journal has been reversed by a balancing journal (immutable).
    Reversed,
}

impl JournalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "approved" => Some(Self::Approved),
            "posted" => Some(Self::Posted),
            "reversed" => Some(Self::Reversed),
            _ => None,
        }
    }

    /// Returns true if the journal can be modified.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the journal is immutable.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single line in a journal.
///
/// Exactly one of `debit`/`credit` is non-zero on a valid line, and both
/// sides carry the line's currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Position within the journal (1-based, contiguous).
    pub line_number: u32,
    /// The account to post to.
    pub account_id: AccountId,
    /// The debit amount (zero if this is a credit line).
    pub debit: Money,
    /// The credit amount (zero if this is a debit line).
    pub credit: Money,
    /// Exchange rate to the tenant's base currency.
    pub exchange_rate: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
}

impl JournalLine {
    /// Creates a debit line with an exchange rate of 1.
    #[must_use]
    pub fn debit(line_number: u32, account_id: AccountId, amount: Money) -> Self {
        Self {
            line_number,
            account_id,
            debit: amount,
            credit: Money::zero(amount.currency()),
            exchange_rate: Decimal::ONE,
            cost_center_id: None,
        }
    }

    /// Creates a credit line with an exchange rate of 1.
    #[must_use]
    pub fn credit(line_number: u32, account_id: AccountId, amount: Money) -> Self {
        Self {
            line_number,
            account_id,
            debit: Money::zero(amount.currency()),
            credit: amount,
            exchange_rate: Decimal::ONE,
            cost_center_id: None,
        }
    }

    /// Sets the exchange rate to the tenant's base currency.
    #[must_use]
    pub fn with_exchange_rate(mut self, exchange_rate: Decimal) -> Self {
        self.exchange_rate = exchange_rate;
        self
    }

    /// Returns the line's currency (taken from the debit side; valid lines
    /// carry the same currency on both sides).
    #[must_use]
    pub const fn currency(&self) -> tally_shared::types::Currency {
        self.debit.currency()
    }

    /// Returns true if this line carries its amount on the debit side.
    #[must_use]
    pub const fn is_debit(&self) -> bool {
        self.debit.is_positive()
    }
}

/// A journal document: header plus ordered lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier.
    pub id: JournalId,
    /// Tenant this journal belongs to.
    pub tenant_id: TenantId,
    /// Journal type classification.
    pub journal_type: JournalType,
    /// The economic date of the transaction.
    pub transaction_date: NaiveDate,
    /// The ledger date; defaults to `transaction_date` when absent.
    pub posting_date: Option<NaiveDate>,
    /// Header currency (ISO 4217).
    pub currency: tally_shared::types::Currency,
    /// Exchange rate to the tenant's base currency.
    pub exchange_rate: Decimal,
    /// A description of the journal.
    pub description: String,
    /// Current workflow status.
    pub status: JournalStatus,
    /// The user who created the journal.
    pub created_by: UserId,
    /// The ordered journal lines.
    pub lines: Vec<JournalLine>,
}

impl Journal {
    /// Returns the date the ledger effect is recorded on.
    #[must_use]
    pub fn effective_posting_date(&self) -> NaiveDate {
        self.posting_date.unwrap_or(self.transaction_date)
    }

    /// Returns true if the journal can still be edited.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        self.status.is_editable()
    }
}
