// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Instances
//!
//! Engine records for running and finished instances, their live tasks and
//! system variables, plus the role-facing projections built from them.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Instance value objects and engine query filters

use crate::domain::status::StatusInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix shared by every system variable the BFF reads.
pub const SYSTEM_VARIABLE_PREFIX: &str = "sys-var-";
/// Business result written by the process on completion.
pub const PROCESS_COMPLETION_RESULT_VARIABLE: &str = "sys-var-process-completion-result";
/// Id of the excerpt generated by the process, if any.
pub const PROCESS_EXCERPT_ID_VARIABLE: &str = "sys-var-process-excerpt-id";
/// Variable through which a started instance finds its start-form payload.
pub const START_FORM_STORAGE_KEY_VARIABLE: &str = "start_form_storage_key";

/// Historic process instance as returned by the engine.
///
/// Also used for unfinished instances: the history endpoint is the only one
/// that returns definition names and start times in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricProcessInstance {
    pub id: String,
    pub process_definition_id: String,
    pub process_definition_key: Option<String>,
    pub process_definition_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub state: String,
}

/// Unfinished instance with its role-scoped status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstanceSummary {
    pub id: String,
    pub process_definition_id: String,
    pub process_definition_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub status: StatusInfo,
}

/// Final status of a historic instance.
///
/// `code` is the engine state verbatim; `title` is only set for COMPLETED and
/// EXTERNALLY_TERMINATED.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStatus {
    pub code: String,
    pub title: Option<String>,
}

/// Historic instance enriched with its system variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInstance {
    pub id: String,
    pub process_definition_id: String,
    pub process_definition_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: HistoryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt_id: Option<String>,
}

/// Live user task; only its owning instance matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: Option<String>,
    pub process_instance_id: Option<String>,
}

/// Historic variable instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricVariable {
    pub name: String,
    pub value: serde_json::Value,
    pub process_instance_id: Option<String>,
}

impl HistoricVariable {
    /// String form of the value; `None` for JSON null.
    pub fn value_as_string(&self) -> Option<String> {
        match &self.value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Engine response to a start command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedInstance {
    pub id: String,
    pub definition_id: String,
    pub ended: bool,
}

/// Result of starting a process, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProcessResult {
    pub id: String,
    pub process_definition_id: String,
    pub ended: bool,
}

impl From<StartedInstance> for StartProcessResult {
    fn from(started: StartedInstance) -> Self {
        Self {
            id: started.id,
            process_definition_id: started.definition_id,
            ended: started.ended,
        }
    }
}

/// Historic instance filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInstanceQuery {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub root_process_instances: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unfinished: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub finished: bool,
}

impl HistoryInstanceQuery {
    pub fn unfinished_roots() -> Self {
        Self {
            root_process_instances: true,
            unfinished: true,
            finished: false,
        }
    }

    pub fn finished_roots() -> Self {
        Self {
            root_process_instances: true,
            unfinished: false,
            finished: true,
        }
    }
}

/// Runtime instance count filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceCountQuery {
    pub root_process_instances: bool,
}

/// Live task filter over a set of instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub process_instance_id_in: Vec<String>,
}

/// Historic variable filter. Always carries a name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_instance_id_in: Vec<String>,
    pub variable_name_like: String,
}

impl VariableQuery {
    /// System variables of many instances in one query.
    pub fn system_variables_of(instance_ids: Vec<String>) -> Self {
        Self {
            process_instance_id: None,
            process_instance_id_in: instance_ids,
            variable_name_like: format!("{}%", SYSTEM_VARIABLE_PREFIX),
        }
    }

    /// System variables of a single instance.
    pub fn system_variables_of_instance(instance_id: impl Into<String>) -> Self {
        Self {
            process_instance_id: Some(instance_id.into()),
            process_instance_id_in: Vec::new(),
            variable_name_like: format!("{}%", SYSTEM_VARIABLE_PREFIX),
        }
    }
}
