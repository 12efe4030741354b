// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Static message catalogue backing [`MessageResolver`].

use crate::domain::messages::{
    MessageResolver, HISTORY_STATUS_COMPLETED_KEY, HISTORY_STATUS_EXTERNALLY_TERMINATED_KEY,
};
use crate::domain::status::StatusCode;
use std::collections::HashMap;

/// Built-in English titles, overridable per key.
///
/// Unknown keys resolve to the key itself so a missing translation shows up
/// in the UI instead of failing the request.
#[derive(Debug, Clone)]
pub struct StaticMessageResolver {
    messages: HashMap<String, String>,
}

impl StaticMessageResolver {
    pub fn new() -> Self {
        let defaults = [
            (StatusCode::Pending, "Pending"),
            (StatusCode::Suspended, "Suspended"),
            (StatusCode::InProgress, "In progress"),
            (StatusCode::CitizenPending, "Waiting for your action"),
            (StatusCode::CitizenSuspended, "Suspended"),
            (StatusCode::CitizenInProgress, "In progress"),
        ];

        let mut messages: HashMap<String, String> = defaults
            .into_iter()
            .map(|(code, title)| (code.message_key(), title.to_string()))
            .collect();
        messages.insert(HISTORY_STATUS_COMPLETED_KEY.to_string(), "Completed".to_string());
        messages.insert(
            HISTORY_STATUS_EXTERNALLY_TERMINATED_KEY.to_string(),
            "Cancelled".to_string(),
        );

        Self { messages }
    }

    /// Replace titles for the given keys
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        self.messages
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

impl Default for StaticMessageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageResolver for StaticMessageResolver {
    fn resolve(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
