// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process History
//!
//! Finished root instances, enriched with the system variables the process
//! left behind (completion result, excerpt id).
//!
//! # Architecture
//!
//! - **Layer:** Application
//! - **Collaborators:** `ProcessEngine`, `MessageResolver`
//!
//! A page is enriched from one batched variable query over all of its ids.
//! A single-instance lookup queries the variables of that one id. Both go
//! through [`HistoryEnricher::enrich`], so the overlay rules are shared and
//! only the query granularity differs.

use crate::application::error::ProcessError;
use crate::domain::engine::ProcessEngine;
use crate::domain::messages::{
    MessageResolver, HISTORY_STATUS_COMPLETED_KEY, HISTORY_STATUS_EXTERNALLY_TERMINATED_KEY,
};
use crate::domain::pageable::Pageable;
use crate::domain::process_instance::{
    HistoricProcessInstance, HistoricVariable, HistoryInstance, HistoryInstanceQuery,
    HistoryStatus, VariableQuery, PROCESS_COMPLETION_RESULT_VARIABLE,
    PROCESS_EXCERPT_ID_VARIABLE,
};
use crate::domain::status::{ENGINE_STATE_COMPLETED, ENGINE_STATE_EXTERNALLY_TERMINATED};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Variables of one instance, keyed by variable name.
pub type VariablesByName = HashMap<String, HistoricVariable>;

/// Group a batched variable result by instance id, then by name.
///
/// Variables that carry no instance id cannot be attributed and are dropped.
pub fn group_by_instance(variables: Vec<HistoricVariable>) -> HashMap<String, VariablesByName> {
    let mut grouped: HashMap<String, VariablesByName> = HashMap::new();
    for variable in variables {
        if let Some(instance_id) = variable.process_instance_id.clone() {
            grouped
                .entry(instance_id)
                .or_default()
                .insert(variable.name.clone(), variable);
        }
    }
    grouped
}

fn by_name(variables: Vec<HistoricVariable>) -> VariablesByName {
    variables.into_iter().map(|v| (v.name.clone(), v)).collect()
}

/// Overlays system variables and status titles onto historic instances.
pub struct HistoryEnricher {
    messages: Arc<dyn MessageResolver>,
}

impl HistoryEnricher {
    pub fn new(messages: Arc<dyn MessageResolver>) -> Self {
        Self { messages }
    }

    /// Enrich a page with the result of one batched variable query.
    pub fn enrich_page(
        &self,
        instances: Vec<HistoricProcessInstance>,
        variables: Vec<HistoricVariable>,
    ) -> Vec<HistoryInstance> {
        let grouped = group_by_instance(variables);
        instances
            .into_iter()
            .map(|instance| {
                let variables = grouped.get(&instance.id);
                self.enrich(instance, variables)
            })
            .collect()
    }

    /// Map one instance and overlay its status and excerpt id.
    pub fn enrich(
        &self,
        instance: HistoricProcessInstance,
        variables: Option<&VariablesByName>,
    ) -> HistoryInstance {
        let variable = |name: &str| {
            variables
                .and_then(|vars| vars.get(name))
                .and_then(HistoricVariable::value_as_string)
        };

        let title = match instance.state.as_str() {
            ENGINE_STATE_EXTERNALLY_TERMINATED => {
                Some(self.messages.resolve(HISTORY_STATUS_EXTERNALLY_TERMINATED_KEY))
            }
            ENGINE_STATE_COMPLETED => Some(
                variable(PROCESS_COMPLETION_RESULT_VARIABLE)
                    .unwrap_or_else(|| self.messages.resolve(HISTORY_STATUS_COMPLETED_KEY)),
            ),
            _ => None,
        };
        let excerpt_id = variable(PROCESS_EXCERPT_ID_VARIABLE);

        HistoryInstance {
            id: instance.id,
            process_definition_id: instance.process_definition_id,
            process_definition_name: instance.process_definition_name,
            start_time: instance.start_time,
            end_time: instance.end_time,
            status: HistoryStatus {
                code: instance.state,
                title,
            },
            excerpt_id,
        }
    }
}

/// Finished-instance queries for both roles.
pub struct HistoryService {
    engine: Arc<dyn ProcessEngine>,
    enricher: HistoryEnricher,
}

impl HistoryService {
    pub fn new(engine: Arc<dyn ProcessEngine>, messages: Arc<dyn MessageResolver>) -> Self {
        Self {
            engine,
            enricher: HistoryEnricher::new(messages),
        }
    }

    /// One page of finished root instances.
    pub async fn list_history(&self, page: &Pageable) -> Result<Vec<HistoryInstance>, ProcessError> {
        let instances = self
            .engine
            .list_history_instances(&HistoryInstanceQuery::finished_roots(), page)
            .await?;

        if instances.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = instances.iter().map(|i| i.id.clone()).collect();
        debug!("Loading system variables for {} historic instances", ids.len());
        let variables = self
            .engine
            .list_history_variables(&VariableQuery::system_variables_of(ids))
            .await?;

        Ok(self.enricher.enrich_page(instances, variables))
    }

    pub async fn count_history(&self) -> Result<u64, ProcessError> {
        Ok(self
            .engine
            .count_history_instances(&HistoryInstanceQuery::finished_roots())
            .await?)
    }

    pub async fn get_history_by_id(&self, id: &str) -> Result<HistoryInstance, ProcessError> {
        let instance = self.engine.get_history_instance_by_id(id).await?;
        let variables = self
            .engine
            .list_history_variables(&VariableQuery::system_variables_of_instance(id))
            .await?;

        let variables = by_name(variables);
        Ok(self.enricher.enrich(instance, Some(&variables)))
    }
}
