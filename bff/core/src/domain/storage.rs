// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Form Data Storage Trait - Anti-Corruption Layer for object storage
//!
//! Provides abstraction over the object store that keeps submitted start-form
//! payloads, so the domain never depends on a concrete storage product and
//! tests can run against an in-memory store.
//!
//! Only the write path exists: the engine receives the storage key, and
//! whoever runs the process reads the payload back.

use crate::domain::form::FormStartPayload;
use async_trait::async_trait;
use thiserror::Error;

/// Build the object key for a start-form submission.
///
/// Layout: `process-definition/{definitionKey}/start-form/{submissionId}`.
pub fn start_form_storage_key(definition_key: &str, submission_id: &str) -> String {
    format!(
        "process-definition/{}/start-form/{}",
        definition_key, submission_id
    )
}

/// Object storage for form payloads
#[async_trait]
pub trait FormDataStorage: Send + Sync {
    /// Store a payload under `key`, replacing whatever was there
    ///
    /// # Arguments
    /// * `key` - Object key (see [`start_form_storage_key`])
    /// * `payload` - Form content including the injected access token
    ///
    /// # Returns
    /// * `Ok(())` if the object was written
    /// * `Err(StorageError)` if the write failed
    async fn put_form_data(&self, key: &str, payload: &FormStartPayload) -> Result<(), StorageError>;

    /// Check health of storage backend
    async fn health_check(&self) -> Result<(), StorageError>;
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout while communicating with storage backend")]
    Timeout,

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown storage error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StorageError::Timeout
        } else if err.is_connect() {
            StorageError::Network(err.to_string())
        } else {
            StorageError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
