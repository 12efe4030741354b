// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Unfinished Process Instances
//!
//! Role-scoped listing of running root instances. Officer and citizen go
//! through the same query and the same task batch; only the status namespace
//! passed to [`derive_status_code`] differs.

use crate::application::error::ProcessError;
use crate::domain::engine::ProcessEngine;
use crate::domain::messages::MessageResolver;
use crate::domain::pageable::Pageable;
use crate::domain::process_instance::{
    HistoricProcessInstance, HistoryInstanceQuery, InstanceCountQuery, ProcessInstanceSummary,
    TaskQuery,
};
use crate::domain::status::{derive_status_code, Role, StatusInfo};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct InstanceService {
    engine: Arc<dyn ProcessEngine>,
    messages: Arc<dyn MessageResolver>,
}

impl InstanceService {
    pub fn new(engine: Arc<dyn ProcessEngine>, messages: Arc<dyn MessageResolver>) -> Self {
        Self { engine, messages }
    }

    pub async fn count_instances(&self) -> Result<u64, ProcessError> {
        let query = InstanceCountQuery {
            root_process_instances: true,
        };
        Ok(self.engine.count_instances(&query).await?)
    }

    pub async fn list_officer_instances(
        &self,
        page: &Pageable,
    ) -> Result<Vec<ProcessInstanceSummary>, ProcessError> {
        self.list_instances(Role::Officer, page).await
    }

    pub async fn list_citizen_instances(
        &self,
        page: &Pageable,
    ) -> Result<Vec<ProcessInstanceSummary>, ProcessError> {
        self.list_instances(Role::Citizen, page).await
    }

    /// One page of unfinished root instances with statuses for `role`.
    pub async fn list_instances(
        &self,
        role: Role,
        page: &Pageable,
    ) -> Result<Vec<ProcessInstanceSummary>, ProcessError> {
        let instances = self
            .engine
            .list_history_instances(&HistoryInstanceQuery::unfinished_roots(), page)
            .await?;

        let task_counts = self.live_task_counts(&instances).await?;

        Ok(instances
            .into_iter()
            .map(|instance| {
                let has_live_task = task_counts.get(&instance.id).copied().unwrap_or(0) > 0;
                self.to_summary(role, instance, has_live_task)
            })
            .collect())
    }

    /// Live tasks per instance id, from a single task query.
    async fn live_task_counts(
        &self,
        instances: &[HistoricProcessInstance],
    ) -> Result<HashMap<String, usize>, ProcessError> {
        if instances.is_empty() {
            return Ok(HashMap::new());
        }

        let query = TaskQuery {
            process_instance_id_in: instances.iter().map(|i| i.id.clone()).collect(),
        };
        let tasks = self.engine.list_tasks(&query).await?;
        debug!("{} live tasks across {} instances", tasks.len(), instances.len());

        let mut counts = HashMap::new();
        for task in tasks {
            if let Some(instance_id) = task.process_instance_id {
                *counts.entry(instance_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    fn to_summary(
        &self,
        role: Role,
        instance: HistoricProcessInstance,
        has_live_task: bool,
    ) -> ProcessInstanceSummary {
        let code = derive_status_code(role, &instance.state, has_live_task);
        ProcessInstanceSummary {
            id: instance.id,
            process_definition_id: instance.process_definition_id,
            process_definition_name: instance.process_definition_name,
            start_time: instance.start_time,
            status: StatusInfo {
                code,
                title: self.messages.resolve(&code.message_key()),
            },
        }
    }
}
