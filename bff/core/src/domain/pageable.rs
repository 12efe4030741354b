// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Pageable
//!
//! Pagination and sort request forwarded to the engine untouched.

use serde::{Deserialize, Serialize};

/// Caller-supplied pagination and sorting.
///
/// Every field is optional and nothing is defaulted here; absent fields are
/// simply not sent to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_result: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl Pageable {
    pub fn new(first_result: Option<u32>, max_results: Option<u32>) -> Self {
        Self {
            first_result,
            max_results,
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, sort_by: impl Into<String>, sort_order: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(sort_order.into());
        self
    }
}
