//! Account domain types.

use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, TenantId};

/// Classification of an account in the chart of accounts.
///
/// The account type determines the side on which the account naturally
/// increases (its normal balance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, fixed assets).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the string representation of the account type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Parses an account type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the normal balance side derived from the account type.
    ///
    /// Asset/Expense accounts are debit-normal; Liability/Equity/Revenue
    /// accounts are credit-normal.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The side on which an account type naturally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

/// A node in a tenant's chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Tenant this account belongs to.
    pub tenant_id: TenantId,
    /// Account code (e.g. "1100").
    pub code: String,
    /// Human-readable account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Optional parent account (same tenant, no cycles).
    pub parent_id: Option<AccountId>,
    /// Whether the account accepts new postings.
    pub is_active: bool,
}

impl Account {
    /// Returns the normal balance side for this account.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}
