// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-Memory Form Data Storage
//!
//! Keeps payloads in a process-local map. For development without an object
//! store and for tests; contents are lost on restart.

use crate::domain::form::FormStartPayload;
use crate::domain::storage::{FormDataStorage, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Default, Clone)]
pub struct InMemoryFormDataStorage {
    objects: Arc<RwLock<HashMap<String, FormStartPayload>>>,
}

impl InMemoryFormDataStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored payload under `key`, if any
    pub fn get(&self, key: &str) -> Option<FormStartPayload> {
        self.objects.read().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FormDataStorage for InMemoryFormDataStorage {
    async fn put_form_data(&self, key: &str, payload: &FormStartPayload) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let mut objects = self
            .objects
            .write()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))?;
        objects.insert(key.to_string(), payload.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
