//! Approval rules engine for journal authorization.
//!
//! This module implements the approval rules matching and user
//! authorization checks for journal approvals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_shared::types::ApprovalRuleId;

use crate::journal::JournalType;

use super::error::WorkflowError;

/// User role in the organization hierarchy.
///
/// Roles are ordered from lowest to highest privilege.
/// Higher roles can perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApproverRole {
    /// Can only view journals.
    Viewer = 0,
    /// Can create and submit journals.
    Submitter = 1,
    /// Can approve journals within their limit.
    Approver = 2,
    /// Can approve and post journals.
    Accountant = 3,
    /// Full access except ownership transfer.
    Admin = 4,
    /// Full access including ownership transfer.
    Owner = 5,
}

impl ApproverRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "submitter" => Some(Self::Submitter),
            "approver" => Some(Self::Approver),
            "accountant" => Some(Self::Accountant),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Submitter => "submitter",
            Self::Approver => "approver",
            Self::Accountant => "accountant",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

impl std::fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An approval rule that determines who can approve journals.
///
/// Rules are matched by journal type and functional amount range.
/// When multiple rules match, the one with lowest priority value wins.
#[derive(Debug, Clone)]
pub struct ApprovalRule {
    /// Unique identifier for the rule.
    pub id: ApprovalRuleId,
    /// Human-readable name for the rule.
    pub name: String,
    /// Minimum amount for this rule to apply (inclusive, None = no minimum).
    pub min_amount: Option<Decimal>,
    /// Maximum amount for this rule to apply (inclusive, None = no maximum).
    pub max_amount: Option<Decimal>,
    /// Journal types this rule applies to (empty = all types).
    pub journal_types: Vec<JournalType>,
    /// The role required to approve matching journals.
    pub required_role: ApproverRole,
    /// Priority for rule selection (lower = higher priority).
    pub priority: i16,
}

/// Stateless engine for evaluating approval rules.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Determine the required approver role for a journal.
    ///
    /// Returns the required role if a matching rule is found, None
    /// otherwise. Amounts are matched against the journal's functional
    /// total.
    #[must_use]
    pub fn get_required_approval(
        rules: &[ApprovalRule],
        journal_type: JournalType,
        total_amount: Decimal,
    ) -> Option<ApproverRole> {
        let mut applicable: Vec<_> = rules
            .iter()
            .filter(|r| r.journal_types.is_empty() || r.journal_types.contains(&journal_type))
            .filter(|r| {
                let above_min = r.min_amount.map_or(true, |min| total_amount >= min);
                let below_max = r.max_amount.map_or(true, |max| total_amount <= max);
                above_min && below_max
            })
            .collect();

        // Sort by priority (lower = higher priority)
        applicable.sort_by_key(|r| r.priority);
        applicable.first().map(|r| r.required_role)
    }

    /// Check if a user can approve a journal.
    ///
    /// # Errors
    ///
    /// * `InsufficientRole` if the user's role is below the required role
    /// * `ExceedsApprovalLimit` if the amount exceeds the user's limit
    pub fn can_approve(
        user_role: ApproverRole,
        user_approval_limit: Option<Decimal>,
        required_role: ApproverRole,
        journal_amount: Decimal,
    ) -> Result<(), WorkflowError> {
        if user_role < required_role {
            return Err(WorkflowError::InsufficientRole {
                user_role: user_role.to_string(),
                required_role: required_role.to_string(),
            });
        }

        // Approval limit only binds the Approver role; higher roles are unlimited.
        if user_role == ApproverRole::Approver {
            if let Some(limit) = user_approval_limit {
                if journal_amount > limit {
                    return Err(WorkflowError::ExceedsApprovalLimit {
                        amount: journal_amount,
                        limit,
                    });
                }
            }
        }

        Ok(())
    }
}
