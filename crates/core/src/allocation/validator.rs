//! Payment allocation validation.
//!
//! A payment is applied against one or more invoices. The whole
//! allocation set validates atomically: one bad allocation rejects the
//! batch and nothing is applied.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tally_shared::types::{InvoiceId, Money, PaymentId};

/// One slice of a payment applied to an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// The payment being applied.
    pub payment_id: PaymentId,
    /// The invoice receiving the allocation.
    pub invoice_id: InvoiceId,
    /// The allocated amount, in the payment currency.
    pub amount: Money,
}

/// The outcome of a successful allocation validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationValidation {
    /// Sum of all allocations.
    pub total_allocated: Money,
    /// Payment amount left unapplied (zero when fully allocated).
    pub remaining_amount: Money,
}

/// Errors rejecting a payment allocation batch.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// An allocation is zero or negative.
    #[error("Allocation to invoice {invoice_id} must be positive, got {amount}")]
    NonPositiveAllocation {
        /// The target invoice.
        invoice_id: InvoiceId,
        /// The offending amount.
        amount: Money,
    },

    /// An allocation's currency differs from the payment's.
    #[error("Allocation to invoice {invoice_id} is in {allocation_currency}, payment is in {payment_currency}")]
    CurrencyMismatch {
        /// The target invoice.
        invoice_id: InvoiceId,
        /// The allocation's currency.
        allocation_currency: tally_shared::types::Currency,
        /// The payment's currency.
        payment_currency: tally_shared::types::Currency,
    },

    /// An invoice's outstanding amount is carried in a different currency
    /// than the payment's.
    #[error("Invoice {invoice_id} outstanding is in {outstanding_currency}, payment is in {payment_currency}")]
    OutstandingCurrencyMismatch {
        /// The mismatched invoice.
        invoice_id: InvoiceId,
        /// The currency of the invoice's outstanding amount.
        outstanding_currency: tally_shared::types::Currency,
        /// The payment's currency.
        payment_currency: tally_shared::types::Currency,
    },

    /// An allocation names an invoice the lookup cannot resolve.
    #[error("Unknown invoice {0}")]
    UnknownInvoice(InvoiceId),

    /// Allocations to an invoice exceed its outstanding amount.
    #[error("Allocation to invoice {invoice_id} exceeds outstanding by {over_amount}")]
    OverAllocation {
        /// The over-allocated invoice.
        invoice_id: InvoiceId,
        /// How far past outstanding the allocations go.
        over_amount: Money,
    },

    /// The allocation total exceeds the payment amount.
    #[error("Total allocated {total_allocated} exceeds payment amount {payment_amount}")]
    ExceedsPaymentAmount {
        /// Sum of all allocations.
        total_allocated: Money,
        /// The payment amount.
        payment_amount: Money,
    },

    /// Allocation arithmetic overflowed i64 minor units.
    #[error("Allocation amount overflow")]
    Overflow,
}

impl AllocationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAllocation { .. } => "NON_POSITIVE_ALLOCATION",
            Self::CurrencyMismatch { .. } => "ALLOCATION_CURRENCY_MISMATCH",
            Self::OutstandingCurrencyMismatch { .. } => "OUTSTANDING_CURRENCY_MISMATCH",
            Self::UnknownInvoice(_) => "UNKNOWN_INVOICE",
            Self::OverAllocation { .. } => "OVER_ALLOCATION",
            Self::ExceedsPaymentAmount { .. } => "EXCEEDS_PAYMENT_AMOUNT",
            Self::Overflow => "ALLOCATION_OVERFLOW",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownInvoice(_) => 404,
            Self::OverAllocation { .. } | Self::ExceedsPaymentAmount { .. } => 409,
            Self::NonPositiveAllocation { .. }
            | Self::CurrencyMismatch { .. }
            | Self::OutstandingCurrencyMismatch { .. }
            | Self::Overflow => 400,
        }
    }
}

/// Stateless validator for payment allocation batches.
pub struct AllocationValidator;

impl AllocationValidator {
    /// Validate a payment's allocations against invoice outstanding
    /// amounts.
    ///
    /// `outstanding` resolves an invoice to its currently outstanding
    /// amount; `None` means the invoice is unknown to the caller.
    /// Allocations to the same invoice are aggregated before the
    /// outstanding check, so a batch cannot sidestep the ceiling by
    /// splitting.
    ///
    /// # Errors
    ///
    /// Any failed check rejects the whole batch; see [`AllocationError`].
    pub fn validate<O>(
        payment_amount: Money,
        allocations: &[PaymentAllocation],
        mut outstanding: O,
    ) -> Result<AllocationValidation, AllocationError>
    where
        O: FnMut(InvoiceId) -> Option<Money>,
    {
        let currency = payment_amount.currency();
        let mut total_allocated = Money::zero(currency);
        // Vec keyed by first appearance keeps error reporting in input order.
        let mut per_invoice: Vec<(InvoiceId, Money)> = Vec::new();

        for allocation in allocations {
            if allocation.amount.currency() != currency {
                return Err(AllocationError::CurrencyMismatch {
                    invoice_id: allocation.invoice_id,
                    allocation_currency: allocation.amount.currency(),
                    payment_currency: currency,
                });
            }
            if !allocation.amount.is_positive() {
                return Err(AllocationError::NonPositiveAllocation {
                    invoice_id: allocation.invoice_id,
                    amount: allocation.amount,
                });
            }

            total_allocated = total_allocated
                .checked_add(allocation.amount)
                .map_err(|_| AllocationError::Overflow)?;

            match per_invoice
                .iter_mut()
                .find(|(id, _)| *id == allocation.invoice_id)
            {
                Some((_, sum)) => {
                    *sum = sum
                        .checked_add(allocation.amount)
                        .map_err(|_| AllocationError::Overflow)?;
                }
                None => per_invoice.push((allocation.invoice_id, allocation.amount)),
            }
        }

        for (invoice_id, allocated) in &per_invoice {
            let outstanding_amount = outstanding(*invoice_id)
                .ok_or(AllocationError::UnknownInvoice(*invoice_id))?;
            if outstanding_amount.currency() != currency {
                return Err(AllocationError::OutstandingCurrencyMismatch {
                    invoice_id: *invoice_id,
                    outstanding_currency: outstanding_amount.currency(),
                    payment_currency: currency,
                });
            }
            if allocated.minor_units() > outstanding_amount.minor_units() {
                let over_amount = allocated
                    .checked_sub(outstanding_amount)
                    .map_err(|_| AllocationError::Overflow)?;
                return Err(AllocationError::OverAllocation {
                    invoice_id: *invoice_id,
                    over_amount,
                });
            }
        }

        if total_allocated.minor_units() > payment_amount.minor_units() {
            return Err(AllocationError::ExceedsPaymentAmount {
                total_allocated,
                payment_amount,
            });
        }

        let remaining_amount = payment_amount
            .checked_sub(total_allocated)
            .map_err(|_| AllocationError::Overflow)?;
        Ok(AllocationValidation {
            total_allocated,
            remaining_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tally_shared::types::Currency;

    fn qar(minor: i64) -> Money {
        Money::from_minor(minor, Currency::Qar)
    }

    fn allocation(invoice_id: InvoiceId, amount: Money) -> PaymentAllocation {
        PaymentAllocation {
            payment_id: PaymentId::new(),
            invoice_id,
            amount,
        }
    }

    #[test]
    fn test_full_allocation() {
        let invoice = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> = [(invoice, qar(1000_00))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[allocation(invoice, qar(1000_00))],
            |id| outstanding.get(&id).copied(),
        )
        .unwrap();

        assert_eq!(result.total_allocated, qar(1000_00));
        assert!(result.remaining_amount.is_zero());
    }

    #[test]
    fn test_partial_allocation_leaves_remainder() {
        let invoice = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> = [(invoice, qar(400_00))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[allocation(invoice, qar(400_00))],
            |id| outstanding.get(&id).copied(),
        )
        .unwrap();

        assert_eq!(result.total_allocated, qar(400_00));
        assert_eq!(result.remaining_amount, qar(600_00));
    }

    #[test]
    fn test_allocation_across_multiple_invoices() {
        let first = InvoiceId::new();
        let second = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> =
            [(first, qar(300_00)), (second, qar(700_00))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[
                allocation(first, qar(300_00)),
                allocation(second, qar(700_00)),
            ],
            |id| outstanding.get(&id).copied(),
        )
        .unwrap();

        assert_eq!(result.total_allocated, qar(1000_00));
        assert!(result.remaining_amount.is_zero());
    }

    #[test]
    fn test_over_allocation_rejected() {
        let invoice = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> = [(invoice, qar(500_00))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[allocation(invoice, qar(500_01))],
            |id| outstanding.get(&id).copied(),
        );

        assert!(matches!(
            result,
            Err(AllocationError::OverAllocation { invoice_id, over_amount })
                if invoice_id == invoice && over_amount == qar(1)
        ));
    }

    #[test]
    fn test_split_allocations_cannot_sidestep_ceiling() {
        let invoice = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> = [(invoice, qar(500_00))].into();

        // Two allocations each under the ceiling but over it together.
        let result = AllocationValidator::validate(
            qar(1000_00),
            &[
                allocation(invoice, qar(300_00)),
                allocation(invoice, qar(300_00)),
            ],
            |id| outstanding.get(&id).copied(),
        );

        assert!(matches!(
            result,
            Err(AllocationError::OverAllocation { .. })
        ));
    }

    #[test]
    fn test_total_exceeding_payment_rejected() {
        let first = InvoiceId::new();
        let second = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> =
            [(first, qar(800_00)), (second, qar(800_00))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[
                allocation(first, qar(800_00)),
                allocation(second, qar(800_00)),
            ],
            |id| outstanding.get(&id).copied(),
        );

        assert!(matches!(
            result,
            Err(AllocationError::ExceedsPaymentAmount { .. })
        ));
    }

    #[test]
    fn test_unknown_invoice_rejected() {
        let invoice = InvoiceId::new();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[allocation(invoice, qar(100_00))],
            |_| None,
        );

        assert!(matches!(
            result,
            Err(AllocationError::UnknownInvoice(id)) if id == invoice
        ));
    }

    #[test]
    fn test_zero_allocation_rejected() {
        let invoice = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> = [(invoice, qar(500_00))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[allocation(invoice, qar(0))],
            |id| outstanding.get(&id).copied(),
        );

        assert!(matches!(
            result,
            Err(AllocationError::NonPositiveAllocation { .. })
        ));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let invoice = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> = [(invoice, qar(500_00))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[allocation(invoice, Money::from_minor(100_00, Currency::Usd))],
            |id| outstanding.get(&id).copied(),
        );

        assert!(matches!(
            result,
            Err(AllocationError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_outstanding_currency_mismatch_rejected() {
        let invoice = InvoiceId::new();
        let outstanding: HashMap<InvoiceId, Money> =
            [(invoice, Money::from_minor(500_00, Currency::Usd))].into();

        let result = AllocationValidator::validate(
            qar(1000_00),
            &[allocation(invoice, qar(100_00))],
            |id| outstanding.get(&id).copied(),
        );

        assert!(matches!(
            result,
            Err(AllocationError::OutstandingCurrencyMismatch {
                invoice_id,
                outstanding_currency: Currency::Usd,
                payment_currency: Currency::Qar,
            }) if invoice_id == invoice
        ));
    }

    #[test]
    fn test_empty_allocations_leave_payment_unapplied() {
        let result =
            AllocationValidator::validate(qar(1000_00), &[], |_| None).unwrap();
        assert!(result.total_allocated.is_zero());
        assert_eq!(result.remaining_amount, qar(1000_00));
    }
}
