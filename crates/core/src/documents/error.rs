//! Document reduction error types.

use thiserror::Error;

use tally_shared::types::MoneyError;

/// Errors from reducing an invoice or payment to journal lines.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The invoice has no line items.
    #[error("Invoice has no line items")]
    NoLineItems,

    /// A line item has a zero or negative quantity.
    #[error("Line item {line_number} has non-positive quantity")]
    NonPositiveQuantity {
        /// 1-based position of the offending item.
        line_number: u32,
    },

    /// A line item's unit price currency differs from the document's.
    #[error("Line item {line_number} currency differs from document currency")]
    ItemCurrencyMismatch {
        /// 1-based position of the offending item.
        line_number: u32,
    },

    /// A rate is outside 0..=100.
    #[error("Line item {line_number} has a rate outside 0..=100")]
    RateOutOfRange {
        /// 1-based position of the offending item.
        line_number: u32,
    },

    /// The payment amount is zero or negative.
    #[error("Payment amount must be positive")]
    NonPositivePayment,

    /// Monetary arithmetic failed.
    #[error("Money arithmetic failed: {0}")]
    Money(#[from] MoneyError),
}

impl DocumentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLineItems => "INVOICE_NO_LINE_ITEMS",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::ItemCurrencyMismatch { .. } => "ITEM_CURRENCY_MISMATCH",
            Self::RateOutOfRange { .. } => "RATE_OUT_OF_RANGE",
            Self::NonPositivePayment => "NON_POSITIVE_PAYMENT",
            Self::Money(_) => "MONEY_ARITHMETIC_FAILED",
        }
    }
}
