// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Display-title lookup. Implemented in infrastructure/messages.rs.

/// Title of a COMPLETED instance without a completion-result variable.
pub const HISTORY_STATUS_COMPLETED_KEY: &str = "process-instance.history.status.completed";
/// Title of an EXTERNALLY_TERMINATED instance.
pub const HISTORY_STATUS_EXTERNALLY_TERMINATED_KEY: &str =
    "process-instance.history.status.externally-terminated";

/// Resolves message keys to display strings.
pub trait MessageResolver: Send + Sync {
    fn resolve(&self, key: &str) -> String;
}
