//! Property-based tests for AllocationValidator.
//!
//! These tests validate the allocation ceilings: no invoice goes past
//! its outstanding amount and no payment is over-applied, for any
//! generated batch.

use proptest::prelude::*;
use std::collections::HashMap;

use tally_shared::types::{Currency, InvoiceId, Money, PaymentId};

use crate::allocation::validator::{
    AllocationError, AllocationValidator, PaymentAllocation,
};

fn qar(minor: i64) -> Money {
    Money::from_minor(minor, Currency::Qar)
}

/// A batch of invoices with outstanding amounts, plus one allocation
/// amount per invoice (which may exceed outstanding).
fn arb_batch() -> impl Strategy<Value = (Vec<(InvoiceId, i64, i64)>, i64)> {
    (
        prop::collection::vec((1i64..1_000_000, 1i64..1_000_000), 1..6),
        1i64..4_000_000,
    )
        .prop_map(|(pairs, payment)| {
            let rows = pairs
                .into_iter()
                .map(|(outstanding, allocated)| (InvoiceId::new(), outstanding, allocated))
                .collect();
            (rows, payment)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A batch validates exactly when every ceiling holds.
    #[test]
    fn prop_allocation_ceilings_hold((rows, payment_minor) in arb_batch()) {
        let payment = qar(payment_minor);
        let outstanding: HashMap<InvoiceId, Money> = rows
            .iter()
            .map(|(id, out, _)| (*id, qar(*out)))
            .collect();
        let allocations: Vec<PaymentAllocation> = rows
            .iter()
            .map(|(id, _, alloc)| PaymentAllocation {
                payment_id: PaymentId::new(),
                invoice_id: *id,
                amount: qar(*alloc),
            })
            .collect();

        let any_over_invoice = rows.iter().any(|(_, out, alloc)| alloc > out);
        let total: i64 = rows.iter().map(|(_, _, alloc)| alloc).sum();
        let over_payment = total > payment_minor;

        let result = AllocationValidator::validate(payment, &allocations, |id| {
            outstanding.get(&id).copied()
        });

        match result {
            Ok(validation) => {
                prop_assert!(!any_over_invoice);
                prop_assert!(!over_payment);
                prop_assert_eq!(validation.total_allocated, qar(total));
                prop_assert_eq!(
                    validation.remaining_amount,
                    qar(payment_minor - total)
                );
            }
            Err(AllocationError::OverAllocation { .. }) => prop_assert!(any_over_invoice),
            Err(AllocationError::ExceedsPaymentAmount { .. }) => {
                prop_assert!(over_payment && !any_over_invoice);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
