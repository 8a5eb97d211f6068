//! Business rule validation for journal lines.
//!
//! Validation is pure and side-effect free: a failed check leaves nothing
//! behind and reports the offending line numbers so the caller can correct
//! and resubmit.

use std::collections::BTreeMap;
use thiserror::Error;

use tally_shared::types::{AccountId, Currency, Money};

use crate::accounts::AccountError;

use super::types::JournalLine;

/// Result of journal line validation.
pub type ValidationResult = Result<(), JournalValidationError>;

/// Validation errors for journal lines.
///
/// Each variant carries the offending 1-based line numbers where they
/// apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalValidationError {
    /// Journal has no lines.
    #[error("Journal must have at least one line")]
    Empty,

    /// One or more lines are malformed: both sides non-zero, both sides
    /// zero, a negative side, or mismatched debit/credit currencies.
    #[error("Malformed journal lines: {line_numbers:?}")]
    MalformedLine {
        /// The offending line numbers.
        line_numbers: Vec<u32>,
    },

    /// A line references an account that cannot be posted to.
    #[error("Line {line_number} references unusable account: {source}")]
    UnknownAccount {
        /// The offending line number.
        line_number: u32,
        /// Why the account was rejected.
        #[source]
        source: AccountError,
    },

    /// Debits and credits do not balance for a currency.
    #[error("Journal is unbalanced for {currency}: debits {debits} != credits {credits}")]
    Unbalanced {
        /// The unbalanced currency.
        currency: Currency,
        /// Total debits in that currency.
        debits: Money,
        /// Total credits in that currency.
        credits: Money,
    },

    /// Two or more lines share a line number.
    #[error("Duplicate line numbers: {line_numbers:?}")]
    DuplicateLineNumber {
        /// The duplicated line numbers.
        line_numbers: Vec<u32>,
    },

    /// Line numbers do not form a contiguous 1..N sequence.
    #[error("Line numbers do not form a contiguous 1..N sequence")]
    NonContiguousLineNumbers,
}

impl JournalValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "JOURNAL_EMPTY",
            Self::MalformedLine { .. } => "MALFORMED_LINE",
            Self::UnknownAccount { .. } => "UNKNOWN_ACCOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::DuplicateLineNumber { .. } => "DUPLICATE_LINE_NUMBER",
            Self::NonContiguousLineNumbers => "NON_CONTIGUOUS_LINE_NUMBERS",
        }
    }
}

/// Validates a journal's lines for structure and balance.
///
/// Checks, in order:
/// 1. at least one line;
/// 2. every line has exactly one positive side and consistent currencies;
/// 3. every account resolves via the injected resolver;
/// 4. per-currency balance: debits equal credits exactly in minor units;
/// 5. line numbers are unique and form a contiguous 1..N sequence.
///
/// # Errors
///
/// Returns the first failed check with the offending line numbers. No side
/// effects occur on failure.
pub fn validate_lines<A>(lines: &[JournalLine], mut resolve_account: A) -> ValidationResult
where
    A: FnMut(AccountId) -> Result<(), AccountError>,
{
    if lines.is_empty() {
        return Err(JournalValidationError::Empty);
    }

    let malformed: Vec<u32> = lines
        .iter()
        .filter(|line| {
            let both_sides = line.debit.is_positive() && line.credit.is_positive();
            let no_side = line.debit.is_zero() && line.credit.is_zero();
            let negative = line.debit.is_negative() || line.credit.is_negative();
            let mixed_currency = line.debit.currency() != line.credit.currency();
            both_sides || no_side || negative || mixed_currency
        })
        .map(|line| line.line_number)
        .collect();
    if !malformed.is_empty() {
        return Err(JournalValidationError::MalformedLine {
            line_numbers: malformed,
        });
    }

    for line in lines {
        resolve_account(line.account_id).map_err(|source| {
            JournalValidationError::UnknownAccount {
                line_number: line.line_number,
                source,
            }
        })?;
    }

    // Per-currency balance in minor units: exact, no tolerance.
    let mut totals: BTreeMap<Currency, (i64, i64)> = BTreeMap::new();
    for line in lines {
        let entry = totals.entry(line.currency()).or_insert((0i64, 0i64));
        entry.0 = entry.0.saturating_add(line.debit.minor_units());
        entry.1 = entry.1.saturating_add(line.credit.minor_units());
    }
    for (currency, (debits, credits)) in &totals {
        if debits != credits {
            return Err(JournalValidationError::Unbalanced {
                currency: *currency,
                debits: Money::from_minor(*debits, *currency),
                credits: Money::from_minor(*credits, *currency),
            });
        }
    }

    let mut seen: BTreeMap<u32, u32> = BTreeMap::new();
    for line in lines {
        *seen.entry(line.line_number).or_insert(0) += 1;
    }
    let duplicates: Vec<u32> = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(number, _)| *number)
        .collect();
    if !duplicates.is_empty() {
        return Err(JournalValidationError::DuplicateLineNumber {
            line_numbers: duplicates,
        });
    }
    let contiguous = seen
        .keys()
        .enumerate()
        .all(|(index, number)| *number == u32::try_from(index + 1).unwrap_or(u32::MAX));
    if !contiguous {
        return Err(JournalValidationError::NonContiguousLineNumbers);
    }

    Ok(())
}
