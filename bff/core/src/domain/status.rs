// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Instance Status
//!
//! Role-scoped status vocabulary for unfinished process instances and the
//! single derivation policy that maps engine state onto it.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure status derivation, no I/O
//!
//! Officers and citizens look at the same engine state through disjoint code
//! namespaces. The branch logic lives in [`derive_status_code`] and is written
//! once; [`Role`] only selects the namespace of the resulting code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw engine state of a suspended instance.
pub const ENGINE_STATE_SUSPENDED: &str = "SUSPENDED";
/// Raw engine state of an instance that ran to its end event.
pub const ENGINE_STATE_COMPLETED: &str = "COMPLETED";
/// Raw engine state of an instance cancelled from outside the process.
pub const ENGINE_STATE_EXTERNALLY_TERMINATED: &str = "EXTERNALLY_TERMINATED";

/// Caller role, already validated upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Officer,
    Citizen,
}

/// Status codes shown for unfinished instances.
///
/// Officer and citizen codes never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Pending,
    Suspended,
    InProgress,
    CitizenPending,
    CitizenSuspended,
    CitizenInProgress,
}

impl StatusCode {
    /// Wire name of the code, also used to build message keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Pending => "PENDING",
            StatusCode::Suspended => "SUSPENDED",
            StatusCode::InProgress => "IN_PROGRESS",
            StatusCode::CitizenPending => "CITIZEN_PENDING",
            StatusCode::CitizenSuspended => "CITIZEN_SUSPENDED",
            StatusCode::CitizenInProgress => "CITIZEN_IN_PROGRESS",
        }
    }

    /// Key under which the message resolver holds the display title.
    pub fn message_key(&self) -> String {
        format!(
            "process-instance.status.{}",
            self.as_str().to_lowercase().replace('_', "-")
        )
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed status of an unfinished instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub code: StatusCode,
    pub title: String,
}

/// Role-neutral outcome of the derivation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DerivedState {
    Suspended,
    Pending,
    InProgress,
}

/// Derive the status code of an unfinished instance.
///
/// SUSPENDED wins over task presence; otherwise a live task means the
/// instance is waiting on a person.
pub fn derive_status_code(role: Role, engine_state: &str, has_live_task: bool) -> StatusCode {
    let derived = if engine_state == ENGINE_STATE_SUSPENDED {
        DerivedState::Suspended
    } else if has_live_task {
        DerivedState::Pending
    } else {
        DerivedState::InProgress
    };

    match (role, derived) {
        (Role::Officer, DerivedState::Suspended) => StatusCode::Suspended,
        (Role::Officer, DerivedState::Pending) => StatusCode::Pending,
        (Role::Officer, DerivedState::InProgress) => StatusCode::InProgress,
        (Role::Citizen, DerivedState::Suspended) => StatusCode::CitizenSuspended,
        (Role::Citizen, DerivedState::Pending) => StatusCode::CitizenPending,
        (Role::Citizen, DerivedState::InProgress) => StatusCode::CitizenInProgress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspended_ignores_tasks() {
        assert_eq!(derive_status_code(Role::Officer, "SUSPENDED", true), StatusCode::Suspended);
        assert_eq!(derive_status_code(Role::Officer, "SUSPENDED", false), StatusCode::Suspended);
        assert_eq!(
            derive_status_code(Role::Citizen, "SUSPENDED", true),
            StatusCode::CitizenSuspended
        );
    }

    #[test]
    fn test_live_task_means_pending() {
        assert_eq!(derive_status_code(Role::Officer, "ACTIVE", true), StatusCode::Pending);
        assert_eq!(derive_status_code(Role::Citizen, "ACTIVE", true), StatusCode::CitizenPending);
    }

    #[test]
    fn test_no_task_means_in_progress() {
        assert_eq!(derive_status_code(Role::Officer, "ACTIVE", false), StatusCode::InProgress);
        assert_eq!(
            derive_status_code(Role::Citizen, "ACTIVE", false),
            StatusCode::CitizenInProgress
        );
    }

    #[test]
    fn test_unknown_state_is_not_copied() {
        // whatever the engine sends, the code comes from the policy
        assert_eq!(derive_status_code(Role::Officer, "illegal", false), StatusCode::InProgress);
    }

    #[test]
    fn test_role_namespaces_are_disjoint() {
        for state in ["ACTIVE", "SUSPENDED", "illegal"] {
            for has_task in [true, false] {
                let officer = derive_status_code(Role::Officer, state, has_task);
                let citizen = derive_status_code(Role::Citizen, state, has_task);
                assert!(!officer.as_str().starts_with("CITIZEN_"));
                assert!(citizen.as_str().starts_with("CITIZEN_"));
            }
        }
    }

    #[test]
    fn test_message_keys() {
        assert_eq!(StatusCode::Pending.message_key(), "process-instance.status.pending");
        assert_eq!(
            StatusCode::CitizenInProgress.message_key(),
            "process-instance.status.citizen-in-progress"
        );
    }

    #[test]
    fn test_status_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&StatusCode::CitizenPending).unwrap();
        assert_eq!(json, "\"CITIZEN_PENDING\"");
    }
}
