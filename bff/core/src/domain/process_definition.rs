// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Definitions
//!
//! Engine snapshots of workflow templates and the caller-facing summary.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Definition value objects and query filters

use serde::{Deserialize, Serialize};

/// Definition as returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    pub id: String,
    pub key: String,
    pub name: Option<String>,
    pub version: i32,
    pub suspended: bool,
}

/// Definition shown to callers.
///
/// `start_form_key` is only ever filled from the batch start-form lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinitionSummary {
    pub id: String,
    pub key: String,
    pub name: Option<String>,
    pub suspended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_form_key: Option<String>,
}

impl From<ProcessDefinition> for ProcessDefinitionSummary {
    fn from(definition: ProcessDefinition) -> Self {
        Self {
            id: definition.id,
            key: definition.key,
            name: definition.name,
            suspended: definition.suspended,
            start_form_key: None,
        }
    }
}

/// Caller-level filter for definition listing and counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionFilter {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub suspended: bool,
}

/// Engine-level definition query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionQuery {
    pub latest_version: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub active: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub suspended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl DefinitionQuery {
    /// Latest versions only, filtered by the caller's flags, sorted by name.
    pub fn latest(filter: DefinitionFilter) -> Self {
        Self {
            latest_version: true,
            active: filter.active,
            suspended: filter.suspended,
            sort_by: Some("name".to_string()),
            sort_order: Some("asc".to_string()),
        }
    }

    /// Same filter without sorting, for counts.
    pub fn without_sort(mut self) -> Self {
        self.sort_by = None;
        self.sort_order = None;
        self
    }
}
