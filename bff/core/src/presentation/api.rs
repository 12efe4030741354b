// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP API
//!
//! axum router over the application services. Handlers only extract, call
//! one service method and serialize; the role of an instance listing comes
//! from the route prefix.

use crate::application::{
    DefinitionService, HistoryService, InstanceService, ProcessError, StartProcessUseCase,
};
use crate::domain::engine::EngineError;
use crate::domain::form::FormStartPayload;
use crate::domain::pageable::Pageable;
use crate::domain::process_definition::DefinitionFilter;
use crate::domain::storage::FormDataStorage;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Header carrying the caller's access token on start-form submissions.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

pub struct AppState {
    pub definitions: DefinitionService,
    pub instances: InstanceService,
    pub history: HistoryService,
    pub start_process: Arc<dyn StartProcessUseCase>,
    pub storage: Arc<dyn FormDataStorage>,
}

pub fn app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health))
        .route("/api/process-definitions", get(list_definitions))
        .route("/api/process-definitions/count", get(count_definitions))
        .route("/api/process-definitions/key/{key}", get(get_definition_by_key))
        .route("/api/process-definitions/{id}", get(get_definition))
        .route("/api/process-definitions/{id}/start", post(start_process))
        .route(
            "/api/process-definitions/{id}/start-form",
            post(start_process_with_form),
        )
        .route("/api/officer/process-instances", get(list_officer_instances))
        .route("/api/officer/process-instances/count", get(count_instances))
        .route("/api/citizen/process-instances", get(list_citizen_instances))
        .route("/api/citizen/process-instances/count", get(count_instances))
        .route("/api/history/process-instances", get(list_history))
        .route("/api/history/process-instances/count", get(count_history))
        .route("/api/history/process-instances/{id}", get(get_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize)]
struct CountResponse {
    count: u64,
}

/// 200 while the form-data store answers, 503 otherwise.
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "storage": "ok" })),
        ),
        Err(e) => {
            warn!("Storage health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "storage": e.to_string() })),
            )
        }
    }
}

async fn count_definitions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DefinitionFilter>,
) -> ApiResult<CountResponse> {
    let count = state.definitions.count_definitions(filter).await?;
    Ok(Json(CountResponse { count }))
}

async fn list_definitions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DefinitionFilter>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.definitions.list_definitions(filter).await?))
}

async fn get_definition(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.definitions.get_definition(&id).await?))
}

async fn get_definition_by_key(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.definitions.get_definition_by_key(&key).await?))
}

async fn start_process(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.start_process.start_process(&id).await?))
}

async fn start_process_with_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<FormStartPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let access_token = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let result = state
        .start_process
        .start_process_with_form(&id, payload, access_token)
        .await?;
    Ok(Json(result))
}

async fn count_instances(State(state): State<Arc<AppState>>) -> ApiResult<CountResponse> {
    let count = state.instances.count_instances().await?;
    Ok(Json(CountResponse { count }))
}

async fn list_officer_instances(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pageable>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.instances.list_officer_instances(&page).await?))
}

async fn list_citizen_instances(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pageable>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.instances.list_citizen_instances(&page).await?))
}

async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pageable>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.history.list_history(&page).await?))
}

async fn count_history(State(state): State<Arc<AppState>>) -> ApiResult<CountResponse> {
    let count = state.history.count_history().await?;
    Ok(Json(CountResponse { count }))
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.history.get_history_by_id(&id).await?))
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP face of [`ProcessError`]
#[derive(Debug)]
pub struct ApiError(pub ProcessError);

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ProcessError::Engine(EngineError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ProcessError::Engine(EngineError::Client { status, .. }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
                "ENGINE_REJECTED",
            ),
            ProcessError::Engine(_) => (StatusCode::BAD_GATEWAY, "ENGINE_UNAVAILABLE"),
            ProcessError::StartForm(_) => (StatusCode::UNPROCESSABLE_ENTITY, "START_FORM_NOT_DEFINED"),
            ProcessError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ProcessError::MissingAccessToken => (StatusCode::UNAUTHORIZED, "ACCESS_TOKEN_REQUIRED"),
            ProcessError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ProcessError::FormValidator(_) => (StatusCode::BAD_GATEWAY, "FORM_VALIDATOR_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let details = match &self.0 {
            ProcessError::Validation(detail) => serde_json::to_value(detail).ok(),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.0.to_string(),
            code: code.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
