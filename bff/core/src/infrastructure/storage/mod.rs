// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Storage Infrastructure Module
//!
//! Concrete implementations of the FormDataStorage trait.

pub mod http;
pub mod in_memory;

pub use http::HttpObjectStorage;
pub use in_memory::InMemoryFormDataStorage;

use crate::domain::bff_config::{StorageBackendKind, StorageConfig};
use crate::domain::storage::{FormDataStorage, StorageError};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Create the storage backend selected in configuration
pub fn create_form_data_storage(
    config: &StorageConfig,
) -> Result<Arc<dyn FormDataStorage>, StorageError> {
    if !config.backend.is_durable() {
        warn!(
            "Storage backend {:?} keeps start-form payloads in process memory; \
             engine workers cannot read them and they are lost on restart",
            config.backend
        );
    }

    match config.backend {
        StorageBackendKind::Http => {
            let url = config.url.as_deref().ok_or_else(|| {
                StorageError::Unavailable("storage.url is required for the http backend".to_string())
            })?;
            Ok(Arc::new(HttpObjectStorage::with_timeout(
                url,
                &config.bucket,
                Duration::from_secs(config.timeout_seconds),
            )?))
        }
        StorageBackendKind::InMemory => Ok(Arc::new(InMemoryFormDataStorage::new())),
    }
}
