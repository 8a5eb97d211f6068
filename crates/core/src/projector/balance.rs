//! Balance projection over posted lines.
//!
//! Balances are never stored as authoritative state: they are projected
//! on demand by folding posted lines in sequence order. Projecting the
//! same lines twice always yields the same balances.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_shared::types::{AccountId, Currency};

use crate::accounts::{AccountError, NormalBalance};

/// A posted, immutable ledger line as handed back by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedLine {
    /// The account the line hits.
    pub account_id: AccountId,
    /// The line currency.
    pub currency: Currency,
    /// Debit amount in minor units (0 if credit).
    pub debit_minor: i64,
    /// Credit amount in minor units (0 if debit).
    pub credit_minor: i64,
    /// The transaction date of the owning journal.
    pub transaction_date: NaiveDate,
    /// Global posting sequence number, strictly increasing per tenant.
    pub sequence: i64,
}

impl PostedLine {
    /// The signed balance change this line contributes to an account
    /// with the given normal balance.
    #[must_use]
    pub const fn balance_change(&self, normal: NormalBalance) -> i64 {
        match normal {
            NormalBalance::Debit => self.debit_minor - self.credit_minor,
            NormalBalance::Credit => self.credit_minor - self.debit_minor,
        }
    }
}

/// Projected balance for one account in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// The currency of the projection.
    pub currency: Currency,
    /// Total debits in minor units.
    pub debit_total: i64,
    /// Total credits in minor units.
    pub credit_total: i64,
    /// Net balance in minor units, signed per the account's normal side.
    pub balance: i64,
}

impl AccountBalance {
    /// Creates an empty balance for an account/currency pair.
    #[must_use]
    pub const fn new(account_id: AccountId, currency: Currency) -> Self {
        Self {
            account_id,
            currency,
            debit_total: 0,
            credit_total: 0,
            balance: 0,
        }
    }

    fn apply(&mut self, line: &PostedLine, normal: NormalBalance) {
        self.debit_total = self.debit_total.saturating_add(line.debit_minor);
        self.credit_total = self.credit_total.saturating_add(line.credit_minor);
        self.balance = self.balance.saturating_add(line.balance_change(normal));
    }
}

/// Running balance for one posted line on one account.
///
/// `current_balance[N] = previous_balance[N] + balance_change` and
/// `previous_balance[N] = current_balance[N-1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Account version (monotonically increasing, starts at 1).
    pub account_version: i64,
    /// Balance before this line, in minor units.
    pub previous_balance: i64,
    /// Balance after this line, in minor units.
    pub current_balance: i64,
}

impl RunningBalance {
    /// Running balance for the first line on an account.
    #[must_use]
    pub const fn first_entry(balance_change: i64) -> Self {
        Self {
            account_version: 1,
            previous_balance: 0,
            current_balance: balance_change,
        }
    }

    /// Running balance chained onto the previous line's.
    #[must_use]
    pub const fn next_entry(previous: &Self, balance_change: i64) -> Self {
        Self {
            account_version: previous.account_version + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance.saturating_add(balance_change),
        }
    }
}

/// One row of a trial balance, per currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Total debits in minor units.
    pub debit_total: i64,
    /// Total credits in minor units.
    pub credit_total: i64,
}

impl TrialBalanceRow {
    /// A trial balance row nets to zero when debits equal credits.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.debit_total == self.credit_total
    }
}

/// Stateless projector folding posted lines into balances.
pub struct BalanceProjector;

impl BalanceProjector {
    /// Project account balances from posted lines.
    ///
    /// Balances are keyed by `(account, currency)`; amounts in different
    /// currencies are never mixed. Line order does not affect the result.
    ///
    /// # Errors
    ///
    /// Returns the [`AccountError`] from the lookup when a line names an
    /// account it cannot resolve.
    pub fn project<L>(
        lines: &[PostedLine],
        mut normal_balance: L,
    ) -> Result<HashMap<(AccountId, Currency), AccountBalance>, AccountError>
    where
        L: FnMut(AccountId) -> Result<NormalBalance, AccountError>,
    {
        let mut balances: HashMap<(AccountId, Currency), AccountBalance> = HashMap::new();
        for line in lines {
            let normal = normal_balance(line.account_id)?;
            balances
                .entry((line.account_id, line.currency))
                .or_insert_with(|| AccountBalance::new(line.account_id, line.currency))
                .apply(line, normal);
        }
        Ok(balances)
    }

    /// Build the running balance chain for one account's lines, in the
    /// global ledger order `(transaction_date, sequence)`.
    ///
    /// Date comes first so a backdated journal folds at its transaction
    /// date, not at the end of the chain; sequence breaks ties within a
    /// date. Lines hitting other accounts or currencies are the caller's
    /// filtering concern; all given lines are folded.
    #[must_use]
    pub fn running_chain(lines: &[PostedLine], normal: NormalBalance) -> Vec<RunningBalance> {
        let mut ordered: Vec<&PostedLine> = lines.iter().collect();
        ordered.sort_by_key(|line| (line.transaction_date, line.sequence));

        let mut chain: Vec<RunningBalance> = Vec::with_capacity(ordered.len());
        for line in ordered {
            let change = line.balance_change(normal);
            let next = match chain.last() {
                Some(previous) => RunningBalance::next_entry(previous, change),
                None => RunningBalance::first_entry(change),
            };
            chain.push(next);
        }
        chain
    }

    /// Project a per-currency trial balance from posted lines.
    ///
    /// Over lines produced only by balanced journals, every row nets to
    /// zero.
    #[must_use]
    pub fn trial_balance(lines: &[PostedLine]) -> BTreeMap<Currency, TrialBalanceRow> {
        let mut rows: BTreeMap<Currency, TrialBalanceRow> = BTreeMap::new();
        for line in lines {
            let row = rows.entry(line.currency).or_default();
            row.debit_total = row.debit_total.saturating_add(line.debit_minor);
            row.credit_total = row.credit_total.saturating_add(line.credit_minor);
        }
        rows
    }
}
