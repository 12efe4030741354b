// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Engine Port - Anti-Corruption Layer for the workflow engine
//!
//! Typed query and command operations the BFF needs from the remote process
//! engine. Implementations forward every filter, sort and pagination object
//! as given and surface remote failures unchanged: there is no retry and no
//! caching behind this trait.
//!
//! Implemented by `crate::infrastructure::engine_client::CamundaEngineClient`.

use crate::domain::pageable::Pageable;
use crate::domain::process_definition::{DefinitionQuery, ProcessDefinition};
use crate::domain::process_instance::{
    HistoricProcessInstance, HistoricVariable, HistoryInstanceQuery, InstanceCountQuery,
    StartedInstance, Task, TaskQuery, VariableQuery,
};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Typed process variable sent with a start command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableValue {
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub value_type: String,
}

impl VariableValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: serde_json::Value::String(value.into()),
            value_type: "String".to_string(),
        }
    }
}

#[async_trait]
pub trait ProcessEngine: Send + Sync {
    async fn count_definitions(&self, query: &DefinitionQuery) -> Result<u64, EngineError>;

    async fn get_definition(&self, id: &str) -> Result<ProcessDefinition, EngineError>;

    async fn get_definition_by_key(&self, key: &str) -> Result<ProcessDefinition, EngineError>;

    async fn list_definitions(
        &self,
        query: &DefinitionQuery,
    ) -> Result<Vec<ProcessDefinition>, EngineError>;

    /// Start an instance of the definition with the given variables.
    async fn start_instance(
        &self,
        definition_id: &str,
        variables: HashMap<String, VariableValue>,
    ) -> Result<StartedInstance, EngineError>;

    async fn count_instances(&self, query: &InstanceCountQuery) -> Result<u64, EngineError>;

    async fn list_history_instances(
        &self,
        query: &HistoryInstanceQuery,
        page: &Pageable,
    ) -> Result<Vec<HistoricProcessInstance>, EngineError>;

    async fn count_history_instances(
        &self,
        query: &HistoryInstanceQuery,
    ) -> Result<u64, EngineError>;

    async fn get_history_instance_by_id(
        &self,
        id: &str,
    ) -> Result<HistoricProcessInstance, EngineError>;

    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, EngineError>;

    async fn list_history_variables(
        &self,
        query: &VariableQuery,
    ) -> Result<Vec<HistoricVariable>, EngineError>;

    /// Start form key of one definition; `None` when no start form is set.
    async fn get_start_form_key(&self, definition_id: &str) -> Result<Option<String>, EngineError>;

    /// Start form keys of many definitions in one call.
    async fn batch_get_start_form_keys(
        &self,
        definition_ids: &[String],
    ) -> Result<HashMap<String, Option<String>>, EngineError>;
}

/// Process engine errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Engine rejected request (HTTP {status}): {message}")]
    Client { status: u16, message: String },

    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::Unavailable(format!("request timed out: {}", err))
        } else if err.is_decode() {
            EngineError::Serialization(err.to_string())
        } else {
            EngineError::Network(err.to_string())
        }
    }
}
