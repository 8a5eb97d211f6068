//! Property-based tests for WorkflowService.
//!
//! These tests validate the transition table: the lifecycle is strictly
//! linear and immutable statuses admit no outgoing edits.

use proptest::prelude::*;

use crate::journal::JournalStatus;
use crate::workflow::service::WorkflowService;

const ALL_STATUSES: [JournalStatus; 5] = [
    JournalStatus::Draft,
    JournalStatus::Submitted,
    JournalStatus::Approved,
    JournalStatus::Posted,
    JournalStatus::Reversed,
];

fn arb_status() -> impl Strategy<Value = JournalStatus> {
    prop::sample::select(ALL_STATUSES.to_vec())
}

/// The only successor of a status, if any.
fn successor(status: JournalStatus) -> Option<JournalStatus> {
    match status {
        JournalStatus::Draft => Some(JournalStatus::Submitted),
        JournalStatus::Submitted => Some(JournalStatus::Approved),
        JournalStatus::Approved => Some(JournalStatus::Posted),
        JournalStatus::Posted => Some(JournalStatus::Reversed),
        JournalStatus::Reversed => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every status has at most one valid outgoing transition.
    #[test]
    fn prop_transitions_are_linear(from in arb_status(), to in arb_status()) {
        let valid = WorkflowService::is_valid_transition(from, to);
        prop_assert_eq!(valid, successor(from) == Some(to));
    }

    /// The edit gate agrees with the status table: draft only.
    #[test]
    fn prop_edit_gate_matches_status(status in arb_status()) {
        let can_modify = WorkflowService::validate_can_modify(status).is_ok();
        prop_assert_eq!(can_modify, status.is_editable());
    }
}
