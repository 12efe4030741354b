// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Definition Queries
//!
//! Latest-version definitions, enriched with their start-form keys.
//!
//! # Architecture
//!
//! - **Layer:** Application
//! - **Collaborators:** `ProcessEngine`
//!
//! Start-form keys for a listing come from one batch call keyed by definition
//! id. Single-definition lookups do not populate the key.

use crate::application::error::ProcessError;
use crate::domain::engine::ProcessEngine;
use crate::domain::process_definition::{
    DefinitionFilter, DefinitionQuery, ProcessDefinitionSummary,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct DefinitionService {
    engine: Arc<dyn ProcessEngine>,
}

impl DefinitionService {
    pub fn new(engine: Arc<dyn ProcessEngine>) -> Self {
        Self { engine }
    }

    pub async fn count_definitions(&self, filter: DefinitionFilter) -> Result<u64, ProcessError> {
        let query = DefinitionQuery::latest(filter).without_sort();
        Ok(self.engine.count_definitions(&query).await?)
    }

    /// Latest definitions sorted by name, each with its start-form key if any.
    pub async fn list_definitions(
        &self,
        filter: DefinitionFilter,
    ) -> Result<Vec<ProcessDefinitionSummary>, ProcessError> {
        let definitions = self
            .engine
            .list_definitions(&DefinitionQuery::latest(filter))
            .await?;

        if definitions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = definitions.iter().map(|d| d.id.clone()).collect();
        debug!("Fetching start form keys for {} definitions", ids.len());
        let form_keys = self.engine.batch_get_start_form_keys(&ids).await?;

        Ok(definitions
            .into_iter()
            .map(|definition| with_start_form_key(definition.into(), &form_keys))
            .collect())
    }

    pub async fn get_definition(&self, id: &str) -> Result<ProcessDefinitionSummary, ProcessError> {
        Ok(self.engine.get_definition(id).await?.into())
    }

    pub async fn get_definition_by_key(
        &self,
        key: &str,
    ) -> Result<ProcessDefinitionSummary, ProcessError> {
        Ok(self.engine.get_definition_by_key(key).await?.into())
    }
}

/// Set the start-form key from the batch result; a missing or null entry
/// leaves it absent.
fn with_start_form_key(
    mut summary: ProcessDefinitionSummary,
    form_keys: &HashMap<String, Option<String>>,
) -> ProcessDefinitionSummary {
    summary.start_form_key = form_keys.get(&summary.id).cloned().flatten();
    summary
}
