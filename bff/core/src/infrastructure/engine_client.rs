// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Engine REST Client
//!
//! reqwest-based implementation of [`ProcessEngine`] against a
//! Camunda-compatible engine REST API.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** HTTP communication with the process engine
//! - **Integration:** BFF services → engine REST API
//!
//! # Endpoints
//!
//! - `GET  /process-definition[/count|/{id}|/key/{key}]`
//! - `POST /process-definition/{id}/start`
//! - `GET  /process-definition/{id}/startForm`
//! - `POST /extended/start-form` - start form keys of many definitions
//! - `GET  /process-instance/count`
//! - `POST /history/process-instance[/count]`, `GET /history/process-instance/{id}`
//! - `POST /task`
//! - `POST /history/variable-instance`
//!
//! Wire DTOs are private to this module and mapped field by field into the
//! domain types.

use crate::domain::engine::{EngineError, ProcessEngine, VariableValue};
use crate::domain::pageable::Pageable;
use crate::domain::process_definition::{DefinitionQuery, ProcessDefinition};
use crate::domain::process_instance::{
    HistoricProcessInstance, HistoricVariable, HistoryInstanceQuery, InstanceCountQuery,
    StartedInstance, Task, TaskQuery, VariableQuery,
};
use crate::infrastructure::url_path::encode_segment;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Engine REST client
#[derive(Clone)]
pub struct CamundaEngineClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl CamundaEngineClient {
    /// Create a client for the engine at `base_url` (e.g. `http://localhost:8080/engine-rest`).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        auth_token: Option<String>,
    ) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Encoded path segment for a caller-supplied id; dot segments name
    /// nothing in the engine.
    fn segment(value: &str) -> Result<String, EngineError> {
        encode_segment(value).ok_or_else(|| EngineError::NotFound(value.to_string()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, EngineError> {
        let response = self.authorize(request).send().await?;
        let response = check_status(response, resource).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, EngineError> {
        debug!("Engine GET {}", path);
        self.send(self.client.get(self.url(path)), path).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, EngineError> {
        debug!("Engine POST {}", path);
        self.send(self.client.post(self.url(path)).json(body), path)
            .await
    }
}

/// Map non-success responses to [`EngineError`], keeping the body as message.
async fn check_status(response: Response, resource: &str) -> Result<Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| format!("HTTP {}", status));

    Err(if status == StatusCode::NOT_FOUND {
        EngineError::NotFound(resource.to_string())
    } else if status.is_client_error() {
        EngineError::Client {
            status: status.as_u16(),
            message,
        }
    } else {
        EngineError::Unavailable(format!("HTTP {}: {}", status, message))
    })
}

/// Engine timestamps look like `2020-01-01T10:00:00.000+0000`.
mod engine_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid engine date: {}", raw))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountDto {
    count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessDefinitionDto {
    id: String,
    key: String,
    name: Option<String>,
    #[serde(default)]
    version: i32,
    #[serde(default)]
    suspended: bool,
}

impl From<ProcessDefinitionDto> for ProcessDefinition {
    fn from(dto: ProcessDefinitionDto) -> Self {
        Self {
            id: dto.id,
            key: dto.key,
            name: dto.name,
            version: dto.version,
            suspended: dto.suspended,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoricProcessInstanceDto {
    id: String,
    process_definition_id: String,
    process_definition_key: Option<String>,
    process_definition_name: Option<String>,
    #[serde(default, deserialize_with = "engine_date::deserialize")]
    start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "engine_date::deserialize")]
    end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    state: String,
}

impl From<HistoricProcessInstanceDto> for HistoricProcessInstance {
    fn from(dto: HistoricProcessInstanceDto) -> Self {
        Self {
            id: dto.id,
            process_definition_id: dto.process_definition_id,
            process_definition_key: dto.process_definition_key,
            process_definition_name: dto.process_definition_name,
            start_time: dto.start_time,
            end_time: dto.end_time,
            state: dto.state,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDto {
    id: String,
    name: Option<String>,
    process_instance_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoricVariableDto {
    name: String,
    #[serde(default)]
    value: serde_json::Value,
    process_instance_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartedInstanceDto {
    id: String,
    definition_id: String,
    #[serde(default)]
    ended: bool,
}

#[derive(Debug, Deserialize)]
struct StartFormDto {
    key: Option<String>,
}

#[derive(Serialize)]
struct StartInstanceRequest<'a> {
    variables: &'a HashMap<String, VariableValue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SortingDto<'a> {
    sort_by: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<&'a str>,
}

/// History query body: the filter plus optional sorting from the pageable.
#[derive(Serialize)]
struct HistoryQueryBody<'a> {
    #[serde(flatten)]
    query: &'a HistoryInstanceQuery,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sorting: Vec<SortingDto<'a>>,
}

impl<'a> HistoryQueryBody<'a> {
    fn new(query: &'a HistoryInstanceQuery, page: &'a Pageable) -> Self {
        let sorting = page
            .sort_by
            .as_deref()
            .map(|sort_by| SortingDto {
                sort_by,
                sort_order: page.sort_order.as_deref(),
            })
            .into_iter()
            .collect();
        Self { query, sorting }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_result: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchStartFormRequest<'a> {
    process_definition_id_in: &'a [String],
}

#[async_trait]
impl ProcessEngine for CamundaEngineClient {
    async fn count_definitions(&self, query: &DefinitionQuery) -> Result<u64, EngineError> {
        let path = "/process-definition/count";
        debug!("Engine GET {}", path);
        let request = self.client.get(self.url(path)).query(query);
        let count: CountDto = self.send(request, path).await?;
        Ok(count.count)
    }

    async fn get_definition(&self, id: &str) -> Result<ProcessDefinition, EngineError> {
        let dto: ProcessDefinitionDto = self
            .get(&format!("/process-definition/{}", Self::segment(id)?))
            .await?;
        Ok(dto.into())
    }

    async fn get_definition_by_key(&self, key: &str) -> Result<ProcessDefinition, EngineError> {
        let dto: ProcessDefinitionDto = self
            .get(&format!("/process-definition/key/{}", Self::segment(key)?))
            .await?;
        Ok(dto.into())
    }

    async fn list_definitions(
        &self,
        query: &DefinitionQuery,
    ) -> Result<Vec<ProcessDefinition>, EngineError> {
        let path = "/process-definition";
        debug!("Engine GET {}", path);
        let request = self.client.get(self.url(path)).query(query);
        let dtos: Vec<ProcessDefinitionDto> = self.send(request, path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn start_instance(
        &self,
        definition_id: &str,
        variables: HashMap<String, VariableValue>,
    ) -> Result<StartedInstance, EngineError> {
        let dto: StartedInstanceDto = self
            .post(
                &format!("/process-definition/{}/start", Self::segment(definition_id)?),
                &StartInstanceRequest {
                    variables: &variables,
                },
            )
            .await?;
        Ok(StartedInstance {
            id: dto.id,
            definition_id: dto.definition_id,
            ended: dto.ended,
        })
    }

    async fn count_instances(&self, query: &InstanceCountQuery) -> Result<u64, EngineError> {
        let path = "/process-instance/count";
        debug!("Engine GET {}", path);
        let request = self.client.get(self.url(path)).query(query);
        let count: CountDto = self.send(request, path).await?;
        Ok(count.count)
    }

    async fn list_history_instances(
        &self,
        query: &HistoryInstanceQuery,
        page: &Pageable,
    ) -> Result<Vec<HistoricProcessInstance>, EngineError> {
        let path = "/history/process-instance";
        debug!("Engine POST {} {:?}", path, page);
        let request = self
            .client
            .post(self.url(path))
            .query(&PageParams {
                first_result: page.first_result,
                max_results: page.max_results,
            })
            .json(&HistoryQueryBody::new(query, page));
        let dtos: Vec<HistoricProcessInstanceDto> = self.send(request, path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn count_history_instances(
        &self,
        query: &HistoryInstanceQuery,
    ) -> Result<u64, EngineError> {
        let count: CountDto = self.post("/history/process-instance/count", query).await?;
        Ok(count.count)
    }

    async fn get_history_instance_by_id(
        &self,
        id: &str,
    ) -> Result<HistoricProcessInstance, EngineError> {
        let dto: HistoricProcessInstanceDto = self
            .get(&format!("/history/process-instance/{}", Self::segment(id)?))
            .await?;
        Ok(dto.into())
    }

    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, EngineError> {
        let dtos: Vec<TaskDto> = self.post("/task", query).await?;
        Ok(dtos
            .into_iter()
            .map(|dto| Task {
                id: dto.id,
                name: dto.name,
                process_instance_id: dto.process_instance_id,
            })
            .collect())
    }

    async fn list_history_variables(
        &self,
        query: &VariableQuery,
    ) -> Result<Vec<HistoricVariable>, EngineError> {
        let dtos: Vec<HistoricVariableDto> =
            self.post("/history/variable-instance", query).await?;
        Ok(dtos
            .into_iter()
            .map(|dto| HistoricVariable {
                name: dto.name,
                value: dto.value,
                process_instance_id: dto.process_instance_id,
            })
            .collect())
    }

    async fn get_start_form_key(&self, definition_id: &str) -> Result<Option<String>, EngineError> {
        let dto: StartFormDto = self
            .get(&format!(
                "/process-definition/{}/startForm",
                Self::segment(definition_id)?
            ))
            .await?;
        Ok(dto.key)
    }

    async fn batch_get_start_form_keys(
        &self,
        definition_ids: &[String],
    ) -> Result<HashMap<String, Option<String>>, EngineError> {
        self.post(
            "/extended/start-form",
            &BatchStartFormRequest {
                process_definition_id_in: definition_ids,
            },
        )
        .await
    }
}
