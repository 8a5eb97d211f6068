//! Account error types.

use thiserror::Error;

use tally_shared::types::{AccountId, TenantId};

/// Errors that can occur during account resolution and hierarchy changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Account belongs to a different tenant.
    #[error("Account {account_id} does not belong to tenant {tenant_id}")]
    WrongTenant {
        /// The resolved account.
        account_id: AccountId,
        /// The tenant the caller expected.
        tenant_id: TenantId,
    },

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    Inactive(AccountId),

    /// Parent account does not exist in the chart.
    #[error("Parent account {parent_id} of account {account_id} not found")]
    UnknownParent {
        /// The account whose parent link is invalid.
        account_id: AccountId,
        /// The missing parent.
        parent_id: AccountId,
    },

    /// Parent account belongs to a different tenant.
    #[error("Parent account {parent_id} of account {account_id} belongs to another tenant")]
    CrossTenantParent {
        /// The account whose parent link is invalid.
        account_id: AccountId,
        /// The cross-tenant parent.
        parent_id: AccountId,
    },

    /// The parent chain contains a cycle.
    #[error("Account hierarchy cycle detected at account {0}")]
    CycleDetected(AccountId),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::WrongTenant { .. } => "ACCOUNT_WRONG_TENANT",
            Self::Inactive(_) => "ACCOUNT_INACTIVE",
            Self::UnknownParent { .. } => "ACCOUNT_UNKNOWN_PARENT",
            Self::CrossTenantParent { .. } => "ACCOUNT_CROSS_TENANT_PARENT",
            Self::CycleDetected(_) => "ACCOUNT_CYCLE_DETECTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::WrongTenant { .. } => 403,
            Self::Inactive(_)
            | Self::UnknownParent { .. }
            | Self::CrossTenantParent { .. }
            | Self::CycleDetected(_) => 400,
        }
    }
}
