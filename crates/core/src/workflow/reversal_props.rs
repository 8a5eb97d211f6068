//! Property-based tests for ReversalService.
//!
//! These tests validate the correctness properties of reversing journal
//! creation: the original and its reversal must net to zero on every
//! account, in every currency.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use tally_shared::types::{AccountId, Currency, JournalId, Money, TenantId, UserId};

use crate::journal::{Journal, JournalLine, JournalStatus, JournalType};
use crate::workflow::reversal::ReversalService;

/// Strategy for generating random positive minor-unit amounts.
fn arb_amount_minor() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for a balanced debit/credit line pair sharing one amount.
fn arb_balanced_line_pair(first_line_number: u32) -> impl Strategy<Value = Vec<JournalLine>> {
    arb_amount_minor().prop_map(move |minor| {
        let amount = Money::from_minor(minor, Currency::Qar);
        vec![
            JournalLine::debit(first_line_number, AccountId::new(), amount),
            JournalLine::credit(first_line_number + 1, AccountId::new(), amount),
        ]
    })
}

/// Strategy for balanced posted journals with 2 or 4 lines.
fn arb_posted_journal() -> impl Strategy<Value = Journal> {
    prop_oneof![
        arb_balanced_line_pair(1),
        (arb_balanced_line_pair(1), arb_balanced_line_pair(3)).prop_map(|(mut a, b)| {
            a.extend(b);
            a
        }),
    ]
    .prop_map(|lines| Journal {
        id: JournalId::new(),
        tenant_id: TenantId::new(),
        journal_type: JournalType::General,
        transaction_date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
        posting_date: Some(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()),
        currency: Currency::Qar,
        exchange_rate: Decimal::ONE,
        description: "Posted journal".to_string(),
        status: JournalStatus::Posted,
        created_by: UserId::new(),
        lines,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Original plus reversal nets to zero per account.
    #[test]
    fn prop_reversal_nets_to_zero_per_account(journal in arb_posted_journal()) {
        let reversing = ReversalService::create_reversing_journal(
            &journal,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            UserId::new(),
            "Property test",
        );

        let mut net: HashMap<AccountId, i64> = HashMap::new();
        for line in journal.lines.iter().chain(reversing.lines.iter()) {
            *net.entry(line.account_id).or_insert(0) +=
                line.debit.minor_units() - line.credit.minor_units();
        }

        for (account_id, balance) in net {
            prop_assert_eq!(balance, 0, "account {} does not net to zero", account_id);
        }
    }

    /// The reversing journal is itself balanced.
    #[test]
    fn prop_reversing_journal_is_balanced(journal in arb_posted_journal()) {
        let reversing = ReversalService::create_reversing_journal(
            &journal,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            UserId::new(),
            "Property test",
        );

        let debits: i64 = reversing.lines.iter().map(|l| l.debit.minor_units()).sum();
        let credits: i64 = reversing.lines.iter().map(|l| l.credit.minor_units()).sum();
        prop_assert_eq!(debits, credits);
    }

    /// Reversal preserves line count, accounts, and line numbers.
    #[test]
    fn prop_reversal_preserves_structure(journal in arb_posted_journal()) {
        let reversing = ReversalService::create_reversing_journal(
            &journal,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            UserId::new(),
            "Property test",
        );

        prop_assert_eq!(reversing.lines.len(), journal.lines.len());
        for (orig, rev) in journal.lines.iter().zip(reversing.lines.iter()) {
            prop_assert_eq!(orig.account_id, rev.account_id);
            prop_assert_eq!(orig.line_number, rev.line_number);
            prop_assert_eq!(orig.debit, rev.credit);
            prop_assert_eq!(orig.credit, rev.debit);
        }
    }
}
