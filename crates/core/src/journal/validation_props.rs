//! Property-based tests for journal line validation.

use proptest::prelude::*;

use tally_shared::types::{AccountId, Currency, Money};

use crate::accounts::AccountError;

use super::types::JournalLine;
use super::validation::{validate_lines, JournalValidationError};

fn ok_resolver(_id: AccountId) -> Result<(), AccountError> {
    Ok(())
}

/// Strategy for positive minor-unit amounts (0.01 to 1,000,000.00).
fn amount_minor() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for a vector of positive amounts.
fn amounts(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(amount_minor(), 1..=max_len)
}

/// Builds a balanced journal: one debit line per amount, then one credit
/// line for the total.
fn balanced_journal(amounts: &[i64]) -> Vec<JournalLine> {
    let mut lines: Vec<JournalLine> = amounts
        .iter()
        .enumerate()
        .map(|(index, minor)| {
            JournalLine::debit(
                u32::try_from(index + 1).unwrap(),
                AccountId::new(),
                Money::from_minor(*minor, Currency::Qar),
            )
        })
        .collect();
    let total: i64 = amounts.iter().sum();
    lines.push(JournalLine::credit(
        u32::try_from(amounts.len() + 1).unwrap(),
        AccountId::new(),
        Money::from_minor(total, Currency::Qar),
    ));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of positive amounts, a journal that credits their exact
    /// sum validates successfully.
    #[test]
    fn prop_balanced_journal_validates(amounts in amounts(20)) {
        let lines = balanced_journal(&amounts);
        prop_assert!(validate_lines(&lines, ok_resolver).is_ok());
    }

    /// Perturbing the credit total by any non-zero delta makes the journal
    /// unbalanced.
    #[test]
    fn prop_perturbed_journal_is_unbalanced(
        amounts in amounts(20),
        delta in 1i64..10_000i64,
    ) {
        let mut lines = balanced_journal(&amounts);
        let last = lines.len() - 1;
        let credit = lines[last].credit;
        lines[last].credit = Money::from_minor(credit.minor_units() + delta, Currency::Qar);

        let result = validate_lines(&lines, ok_resolver);
        prop_assert!(
            matches!(result, Err(JournalValidationError::Unbalanced { .. })),
            "expected Unbalanced, got {:?}",
            result
        );
    }

    /// Validation is pure: running it twice over the same lines yields the
    /// same verdict.
    #[test]
    fn prop_validation_is_deterministic(amounts in amounts(10)) {
        let lines = balanced_journal(&amounts);
        let first = validate_lines(&lines, ok_resolver);
        let second = validate_lines(&lines, ok_resolver);
        prop_assert_eq!(first.is_ok(), second.is_ok());
    }

    /// A journal whose line numbers skip a position is always rejected.
    #[test]
    fn prop_skipped_line_number_rejected(amounts in amounts(10), skip in 2u32..8u32) {
        let mut lines = balanced_journal(&amounts);
        // Shift every line number at or above `skip` up by one.
        for line in &mut lines {
            if line.line_number >= skip {
                line.line_number += 1;
            }
        }
        // Only journals long enough to contain the skipped slot change shape.
        if lines.len() >= skip as usize {
            let result = validate_lines(&lines, ok_resolver);
            prop_assert!(
                matches!(result, Err(JournalValidationError::NonContiguousLineNumbers)),
                "expected NonContiguousLineNumbers, got {:?}",
                result
            );
        }
    }
}
