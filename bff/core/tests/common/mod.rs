//! Shared test doubles for the process BFF integration tests.
//!
//! Every mock appends to a shared call log so tests can assert both which
//! remote calls were made and in what order.

#![allow(dead_code)]

use async_trait::async_trait;
use bff_core::domain::engine::{EngineError, ProcessEngine, VariableValue};
use bff_core::domain::form::{
    FormStartPayload, FormValidationOutcome, FormValidator, FormValidatorError,
};
use bff_core::domain::messages::MessageResolver;
use bff_core::domain::pageable::Pageable;
use bff_core::domain::process_definition::{DefinitionQuery, ProcessDefinition};
use bff_core::domain::process_instance::{
    HistoricProcessInstance, HistoricVariable, HistoryInstanceQuery, InstanceCountQuery,
    StartedInstance, Task, TaskQuery, VariableQuery,
};
use bff_core::domain::storage::{FormDataStorage, StorageError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn count_calls(log: &CallLog, prefix: &str) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|call| call.starts_with(prefix))
        .count()
}

pub fn definition(id: &str, key: &str) -> ProcessDefinition {
    ProcessDefinition {
        id: id.to_string(),
        key: key.to_string(),
        name: Some(format!("{} name", key)),
        version: 1,
        suspended: false,
    }
}

pub fn historic(id: &str, state: &str) -> HistoricProcessInstance {
    HistoricProcessInstance {
        id: id.to_string(),
        process_definition_id: "add-lab:1:1".to_string(),
        process_definition_key: Some("add-lab".to_string()),
        process_definition_name: Some("Add lab".to_string()),
        start_time: None,
        end_time: None,
        state: state.to_string(),
    }
}

pub fn task(id: &str, instance_id: &str) -> Task {
    Task {
        id: id.to_string(),
        name: Some("Review".to_string()),
        process_instance_id: Some(instance_id.to_string()),
    }
}

pub fn variable(instance_id: &str, name: &str, value: &str) -> HistoricVariable {
    HistoricVariable {
        name: name.to_string(),
        value: serde_json::json!(value),
        process_instance_id: Some(instance_id.to_string()),
    }
}

/// Canned engine that records every call and every started instance.
/// With `fail_start` set, `start_instance` is recorded and then fails.
#[derive(Default)]
pub struct MockEngine {
    pub log: CallLog,
    pub definitions: Vec<ProcessDefinition>,
    pub start_form_keys: HashMap<String, Option<String>>,
    pub batch_form_keys: HashMap<String, Option<String>>,
    pub instances: Vec<HistoricProcessInstance>,
    pub tasks: Vec<Task>,
    pub variables: Vec<HistoricVariable>,
    pub instance_count: u64,
    pub fail_start: bool,
    pub started: Mutex<Vec<(String, HashMap<String, VariableValue>)>>,
    pub task_queries: Mutex<Vec<TaskQuery>>,
    pub variable_queries: Mutex<Vec<VariableQuery>>,
    pub history_queries: Mutex<Vec<HistoryInstanceQuery>>,
}

impl MockEngine {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.log.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl ProcessEngine for MockEngine {
    async fn count_definitions(&self, _query: &DefinitionQuery) -> Result<u64, EngineError> {
        self.record("engine.count_definitions");
        Ok(self.definitions.len() as u64)
    }

    async fn get_definition(&self, id: &str) -> Result<ProcessDefinition, EngineError> {
        self.record(format!("engine.get_definition:{}", id));
        self.definitions
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("process-definition {}", id)))
    }

    async fn get_definition_by_key(&self, key: &str) -> Result<ProcessDefinition, EngineError> {
        self.record(format!("engine.get_definition_by_key:{}", key));
        self.definitions
            .iter()
            .find(|d| d.key == key)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("process-definition key {}", key)))
    }

    async fn list_definitions(
        &self,
        _query: &DefinitionQuery,
    ) -> Result<Vec<ProcessDefinition>, EngineError> {
        self.record("engine.list_definitions");
        Ok(self.definitions.clone())
    }

    async fn start_instance(
        &self,
        definition_id: &str,
        variables: HashMap<String, VariableValue>,
    ) -> Result<StartedInstance, EngineError> {
        self.record(format!("engine.start_instance:{}", definition_id));
        if self.fail_start {
            return Err(EngineError::Unavailable("HTTP 503".to_string()));
        }
        self.started
            .lock()
            .unwrap()
            .push((definition_id.to_string(), variables));
        Ok(StartedInstance {
            id: "instance-1".to_string(),
            definition_id: definition_id.to_string(),
            ended: false,
        })
    }

    async fn count_instances(&self, _query: &InstanceCountQuery) -> Result<u64, EngineError> {
        self.record("engine.count_instances");
        Ok(self.instance_count)
    }

    async fn list_history_instances(
        &self,
        query: &HistoryInstanceQuery,
        _page: &Pageable,
    ) -> Result<Vec<HistoricProcessInstance>, EngineError> {
        self.record("engine.list_history_instances");
        self.history_queries.lock().unwrap().push(query.clone());
        Ok(self.instances.clone())
    }

    async fn count_history_instances(
        &self,
        _query: &HistoryInstanceQuery,
    ) -> Result<u64, EngineError> {
        self.record("engine.count_history_instances");
        Ok(self.instances.len() as u64)
    }

    async fn get_history_instance_by_id(
        &self,
        id: &str,
    ) -> Result<HistoricProcessInstance, EngineError> {
        self.record(format!("engine.get_history_instance_by_id:{}", id));
        self.instances
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("history process-instance {}", id)))
    }

    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, EngineError> {
        self.record("engine.list_tasks");
        self.task_queries.lock().unwrap().push(query.clone());
        Ok(self
            .tasks
            .iter()
            .filter(|t| {
                t.process_instance_id
                    .as_ref()
                    .is_some_and(|id| query.process_instance_id_in.contains(id))
            })
            .cloned()
            .collect())
    }

    async fn list_history_variables(
        &self,
        query: &VariableQuery,
    ) -> Result<Vec<HistoricVariable>, EngineError> {
        self.record("engine.list_history_variables");
        self.variable_queries.lock().unwrap().push(query.clone());
        Ok(self
            .variables
            .iter()
            .filter(|v| match (&query.process_instance_id, &v.process_instance_id) {
                (Some(wanted), Some(actual)) => wanted == actual,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .cloned()
            .collect())
    }

    async fn get_start_form_key(&self, definition_id: &str) -> Result<Option<String>, EngineError> {
        self.record(format!("engine.get_start_form_key:{}", definition_id));
        Ok(self.start_form_keys.get(definition_id).cloned().flatten())
    }

    async fn batch_get_start_form_keys(
        &self,
        _definition_ids: &[String],
    ) -> Result<HashMap<String, Option<String>>, EngineError> {
        self.record("engine.batch_get_start_form_keys");
        Ok(self.batch_form_keys.clone())
    }
}

/// Validator returning a fixed outcome and keeping what it was asked,
/// optionally failing as if the service were down.
pub struct MockValidator {
    pub log: CallLog,
    pub outcome: FormValidationOutcome,
    pub fail: bool,
    pub received: Mutex<Vec<(String, FormStartPayload)>>,
}

impl MockValidator {
    pub fn new(log: CallLog, outcome: FormValidationOutcome) -> Self {
        Self {
            log,
            outcome,
            fail: false,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log, FormValidationOutcome::Valid)
        }
    }
}

#[async_trait]
impl FormValidator for MockValidator {
    async fn validate(
        &self,
        form_key: &str,
        payload: &FormStartPayload,
    ) -> Result<FormValidationOutcome, FormValidatorError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("validator.validate:{}", form_key));
        self.received
            .lock()
            .unwrap()
            .push((form_key.to_string(), payload.clone()));
        if self.fail {
            return Err(FormValidatorError::Unavailable("HTTP 502".to_string()));
        }
        Ok(self.outcome.clone())
    }
}

/// Storage that records writes, optionally failing them and its health check.
pub struct MockStorage {
    pub log: CallLog,
    pub fail: bool,
    pub written: Mutex<Vec<(String, FormStartPayload)>>,
}

impl MockStorage {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: false,
            written: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl FormDataStorage for MockStorage {
    async fn put_form_data(&self, key: &str, payload: &FormStartPayload) -> Result<(), StorageError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("storage.put:{}", key));
        if self.fail {
            return Err(StorageError::Unavailable("object store down".to_string()));
        }
        self.written
            .lock()
            .unwrap()
            .push((key.to_string(), payload.clone()));
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        self.log.lock().unwrap().push("storage.health_check".to_string());
        if self.fail {
            return Err(StorageError::Unavailable("object store down".to_string()));
        }
        Ok(())
    }
}

/// Resolves every key to `<key>`.
pub struct KeyEchoMessages;

impl MessageResolver for KeyEchoMessages {
    fn resolve(&self, key: &str) -> String {
        format!("<{}>", key)
    }
}
