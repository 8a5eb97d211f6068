//! Property-based tests for BalanceProjector.
//!
//! These tests validate that projection is a pure, deterministic fold:
//! balanced inputs always produce zero-netting trial balances, and the
//! running chain is internally consistent.

use chrono::NaiveDate;
use proptest::prelude::*;

use tally_shared::types::{AccountId, Currency};

use crate::accounts::NormalBalance;
use crate::projector::balance::{BalanceProjector, PostedLine};

fn arb_amount_minor() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Balanced line pairs on fresh accounts, sequenced in order.
fn arb_balanced_lines() -> impl Strategy<Value = Vec<PostedLine>> {
    prop::collection::vec(arb_amount_minor(), 1..10).prop_map(|amounts| {
        let mut lines = Vec::with_capacity(amounts.len() * 2);
        let mut sequence = 1;
        for minor in amounts {
            for (debit, credit) in [(minor, 0), (0, minor)] {
                lines.push(PostedLine {
                    account_id: AccountId::new(),
                    currency: Currency::Qar,
                    debit_minor: debit,
                    credit_minor: credit,
                    transaction_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                    sequence,
                });
                sequence += 1;
            }
        }
        lines
    })
}

/// Arbitrary (unbalanced) lines against a single account.
fn arb_single_account_lines() -> impl Strategy<Value = Vec<PostedLine>> {
    let account_id = AccountId::new();
    prop::collection::vec((arb_amount_minor(), any::<bool>()), 1..20).prop_map(
        move |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (minor, is_debit))| PostedLine {
                    account_id,
                    currency: Currency::Qar,
                    debit_minor: if is_debit { minor } else { 0 },
                    credit_minor: if is_debit { 0 } else { minor },
                    transaction_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                    sequence: i as i64 + 1,
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Trial balance over balanced journals nets to zero in every currency.
    #[test]
    fn prop_trial_balance_nets_to_zero(lines in arb_balanced_lines()) {
        let rows = BalanceProjector::trial_balance(&lines);
        for (currency, row) in rows {
            prop_assert!(row.is_balanced(), "{currency} row does not net to zero");
        }
    }

    /// Projecting twice from the same lines gives identical balances.
    #[test]
    fn prop_projection_is_idempotent(lines in arb_balanced_lines()) {
        let first = BalanceProjector::project(&lines, |_| Ok(NormalBalance::Debit)).unwrap();
        let second = BalanceProjector::project(&lines, |_| Ok(NormalBalance::Debit)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The running chain links every step to the previous one, and its
    /// final balance equals the projected balance.
    #[test]
    fn prop_running_chain_is_consistent(lines in arb_single_account_lines()) {
        let chain = BalanceProjector::running_chain(&lines, NormalBalance::Debit);
        prop_assert_eq!(chain.len(), lines.len());

        for (i, step) in chain.iter().enumerate() {
            prop_assert_eq!(step.account_version, i as i64 + 1);
            if i > 0 {
                prop_assert_eq!(step.previous_balance, chain[i - 1].current_balance);
            } else {
                prop_assert_eq!(step.previous_balance, 0);
            }
        }

        let total: i64 = lines
            .iter()
            .map(|l| l.balance_change(NormalBalance::Debit))
            .sum();
        prop_assert_eq!(chain.last().map_or(0, |s| s.current_balance), total);
    }
}
