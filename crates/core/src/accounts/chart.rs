//! The chart of accounts arena.
//!
//! Accounts are stored as nodes in an id-indexed arena with explicit
//! parent-id edges. Acyclicity is validated with a bounded iterative walk
//! on every structural change, never with recursion.

use std::collections::HashMap;

use tally_shared::types::{AccountId, TenantId};

use super::account::{Account, NormalBalance};
use super::error::AccountError;

/// A tenant's chart of accounts.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: HashMap<AccountId, Account>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chart from a list of accounts, validating every parent link.
    ///
    /// # Errors
    ///
    /// Returns the first hierarchy error found.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, AccountError> {
        let mut chart = Self::new();
        for account in accounts {
            chart.accounts.insert(account.id, account);
        }
        chart.validate_hierarchy()?;
        Ok(chart)
    }

    /// Inserts or replaces an account, revalidating its parent chain.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParent`, `CrossTenantParent`, or `CycleDetected` if
    /// the new parent link is invalid; the chart is left unchanged.
    pub fn upsert(&mut self, account: Account) -> Result<(), AccountError> {
        let id = account.id;
        let previous = self.accounts.insert(id, account);
        if let Err(err) = self.validate_parent_chain(id) {
            // Restore the previous state on failure.
            match previous {
                Some(prev) => {
                    self.accounts.insert(id, prev);
                }
                None => {
                    self.accounts.remove(&id);
                }
            }
            return Err(err);
        }
        Ok(())
    }

    /// Changes an account's parent link, rejecting cycles.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist, or a hierarchy
    /// error if the new link is invalid; the chart is left unchanged.
    pub fn set_parent(
        &mut self,
        account_id: AccountId,
        parent_id: Option<AccountId>,
    ) -> Result<(), AccountError> {
        let previous = self
            .accounts
            .get(&account_id)
            .ok_or(AccountError::NotFound(account_id))?
            .parent_id;
        if let Some(account) = self.accounts.get_mut(&account_id) {
            account.parent_id = parent_id;
        }
        if let Err(err) = self.validate_parent_chain(account_id) {
            if let Some(account) = self.accounts.get_mut(&account_id) {
                account.parent_id = previous;
            }
            return Err(err);
        }
        Ok(())
    }

    /// Resolves an account for a tenant.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown, `WrongTenant` if the
    /// account belongs to another tenant, or `Inactive` if it no longer
    /// accepts postings.
    pub fn resolve(
        &self,
        account_id: AccountId,
        tenant_id: TenantId,
    ) -> Result<&Account, AccountError> {
        let account = self
            .accounts
            .get(&account_id)
            .ok_or(AccountError::NotFound(account_id))?;
        if account.tenant_id != tenant_id {
            return Err(AccountError::WrongTenant {
                account_id,
                tenant_id,
            });
        }
        if !account.is_active {
            return Err(AccountError::Inactive(account_id));
        }
        Ok(account)
    }

    /// Returns an account's normal balance side.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn normal_balance(&self, account_id: AccountId) -> Result<NormalBalance, AccountError> {
        self.accounts
            .get(&account_id)
            .map(Account::normal_balance)
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Returns an account without tenant or active checks.
    #[must_use]
    pub fn get(&self, account_id: AccountId) -> Option<&Account> {
        self.accounts.get(&account_id)
    }

    /// Returns the number of accounts in the chart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Validates every account's parent chain.
    ///
    /// # Errors
    ///
    /// Returns the first `UnknownParent`, `CrossTenantParent`, or
    /// `CycleDetected` found.
    pub fn validate_hierarchy(&self) -> Result<(), AccountError> {
        for id in self.accounts.keys() {
            self.validate_parent_chain(*id)?;
        }
        Ok(())
    }

    /// Walks the parent chain from one account toward the root.
    ///
    /// The walk is bounded by the number of accounts in the chart: a chain
    /// longer than that can only mean a cycle.
    fn validate_parent_chain(&self, start: AccountId) -> Result<(), AccountError> {
        let bound = self.accounts.len();
        let mut current = start;
        let mut steps = 0usize;

        loop {
            let account = self
                .accounts
                .get(&current)
                .ok_or(AccountError::NotFound(current))?;
            let Some(parent_id) = account.parent_id else {
                return Ok(());
            };
            let parent =
                self.accounts
                    .get(&parent_id)
                    .ok_or(AccountError::UnknownParent {
                        account_id: current,
                        parent_id,
                    })?;
            if parent.tenant_id != account.tenant_id {
                return Err(AccountError::CrossTenantParent {
                    account_id: current,
                    parent_id,
                });
            }
            steps += 1;
            if steps > bound {
                return Err(AccountError::CycleDetected(start));
            }
            current = parent_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::account::AccountType;

    fn make_account(tenant_id: TenantId, code: &str, account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            tenant_id,
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type,
            parent_id: None,
            is_active: true,
        }
    }

    #[test]
    fn test_resolve_active_account() {
        let tenant_id = TenantId::new();
        let account = make_account(tenant_id, "1100", AccountType::Asset);
        let id = account.id;
        let chart = ChartOfAccounts::from_accounts(vec![account]).unwrap();

        let resolved = chart.resolve(id, tenant_id).unwrap();
        assert_eq!(resolved.code, "1100");
    }

    #[test]
    fn test_resolve_not_found() {
        let chart = ChartOfAccounts::new();
        assert!(matches!(
            chart.resolve(AccountId::new(), TenantId::new()),
            Err(AccountError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_wrong_tenant() {
        let tenant_id = TenantId::new();
        let account = make_account(tenant_id, "1100", AccountType::Asset);
        let id = account.id;
        let chart = ChartOfAccounts::from_accounts(vec![account]).unwrap();

        assert!(matches!(
            chart.resolve(id, TenantId::new()),
            Err(AccountError::WrongTenant { .. })
        ));
    }

    #[test]
    fn test_resolve_inactive() {
        let tenant_id = TenantId::new();
        let mut account = make_account(tenant_id, "1100", AccountType::Asset);
        account.is_active = false;
        let id = account.id;
        let chart = ChartOfAccounts::from_accounts(vec![account]).unwrap();

        assert!(matches!(
            chart.resolve(id, tenant_id),
            Err(AccountError::Inactive(_))
        ));
    }

    #[test]
    fn test_parent_chain_valid() {
        let tenant_id = TenantId::new();
        let parent = make_account(tenant_id, "1000", AccountType::Asset);
        let mut child = make_account(tenant_id, "1100", AccountType::Asset);
        child.parent_id = Some(parent.id);

        let chart = ChartOfAccounts::from_accounts(vec![parent, child]).unwrap();
        assert!(chart.validate_hierarchy().is_ok());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let tenant_id = TenantId::new();
        let mut orphan = make_account(tenant_id, "1100", AccountType::Asset);
        orphan.parent_id = Some(AccountId::new());

        assert!(matches!(
            ChartOfAccounts::from_accounts(vec![orphan]),
            Err(AccountError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_cross_tenant_parent_rejected() {
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let parent = make_account(tenant_b, "1000", AccountType::Asset);
        let mut child = make_account(tenant_a, "1100", AccountType::Asset);
        child.parent_id = Some(parent.id);

        assert!(matches!(
            ChartOfAccounts::from_accounts(vec![parent, child]),
            Err(AccountError::CrossTenantParent { .. })
        ));
    }

    #[test]
    fn test_set_parent_cycle_rejected() {
        let tenant_id = TenantId::new();
        let a = make_account(tenant_id, "1000", AccountType::Asset);
        let mut b = make_account(tenant_id, "1100", AccountType::Asset);
        b.parent_id = Some(a.id);
        let a_id = a.id;
        let b_id = b.id;

        let mut chart = ChartOfAccounts::from_accounts(vec![a, b]).unwrap();

        // a -> b would close the loop a -> b -> a.
        assert!(matches!(
            chart.set_parent(a_id, Some(b_id)),
            Err(AccountError::CycleDetected(_))
        ));
        // The chart must be unchanged after the rejected edit.
        assert_eq!(chart.get(a_id).unwrap().parent_id, None);
    }

    #[test]
    fn test_self_parent_cycle_rejected() {
        let tenant_id = TenantId::new();
        let a = make_account(tenant_id, "1000", AccountType::Asset);
        let a_id = a.id;
        let mut chart = ChartOfAccounts::from_accounts(vec![a]).unwrap();

        assert!(matches!(
            chart.set_parent(a_id, Some(a_id)),
            Err(AccountError::CycleDetected(_))
        ));
    }

    #[test]
    fn test_upsert_rollback_on_invalid_parent() {
        let tenant_id = TenantId::new();
        let mut account = make_account(tenant_id, "1100", AccountType::Asset);
        account.parent_id = Some(AccountId::new());
        let id = account.id;

        let mut chart = ChartOfAccounts::new();
        assert!(chart.upsert(account).is_err());
        assert!(chart.get(id).is_none());
    }
}
