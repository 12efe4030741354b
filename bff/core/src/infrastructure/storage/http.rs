// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP Object Storage Implementation
//!
//! Stores start-form payloads in an S3-style object store through its HTTP
//! gateway. Implements the FormDataStorage trait as an Anti-Corruption Layer.
//!
//! # API Endpoints
//!
//! - `PUT /{bucket}/{key}` - Write object (JSON body)
//! - `GET /` - Health check

use crate::domain::form::FormStartPayload;
use crate::domain::storage::{FormDataStorage, StorageError};
use crate::infrastructure::url_path::encode_path;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Object store HTTP adapter
pub struct HttpObjectStorage {
    client: Client,

    /// Gateway base URL (e.g., "http://localhost:8333")
    base_url: String,

    bucket: String,
}

impl HttpObjectStorage {
    /// Create adapter with the default 30 second timeout
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Result<Self, StorageError> {
        Self::with_timeout(base_url, bucket, Duration::from_secs(30))
    }

    /// Create adapter with custom timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        })
    }

    /// Object URL with every key segment encoded. Empty and dot segments
    /// are rejected so a key cannot leave the bucket.
    fn object_url(&self, key: &str) -> Result<String, StorageError> {
        let path = encode_path(key).ok_or_else(|| StorageError::InvalidKey(key.to_string()))?;
        Ok(format!("{}/{}/{}", self.base_url, self.bucket, path))
    }
}

#[async_trait]
impl FormDataStorage for HttpObjectStorage {
    async fn put_form_data(&self, key: &str, payload: &FormStartPayload) -> Result<(), StorageError> {
        let url = self.object_url(key)?;
        let body = serde_json::to_vec(payload)?;
        debug!("Storage PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(StorageError::PermissionDenied(key.to_string()))
            }
            status if status.is_server_error() => Err(StorageError::Unavailable(format!(
                "HTTP {} while writing {}",
                status, key
            ))),
            status => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("HTTP {}", status));
                Err(StorageError::Unknown(format!(
                    "Failed to write {}: {}",
                    key, error_msg
                )))
            }
        }
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        let response = self.client.get(format!("{}/", self.base_url)).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StorageError::Unavailable(format!(
                "Health check returned {}",
                response.status()
            )))
        }
    }
}
