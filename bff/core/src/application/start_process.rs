// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Start Process Use Case
//!
//! Application service for starting process instances, with or without a
//! submitted start form.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Orchestrate process instance startup
//! - **Collaborators:**
//!   - Infrastructure: ProcessEngine, FormValidator, FormDataStorage
//!
//! # Start With Form
//!
//! ```text
//! FETCH_DEFINITION → FETCH_START_FORM → VALIDATE → PERSIST → START_INSTANCE
//! ```
//!
//! The sequence is linear and stops at the first failure. Nothing is written
//! to storage before the payload has been validated, and the instance is only
//! started once the payload is stored. The engine receives the storage key in
//! a single variable, never the form content itself.
//!
//! Steps 4 and 5 are not idempotent; a caller retrying after a partial
//! failure creates a second stored payload and possibly a second instance.

use crate::application::error::ProcessError;
use crate::domain::engine::{ProcessEngine, VariableValue};
use crate::domain::form::{FormStartPayload, FormValidationOutcome, FormValidator};
use crate::domain::process_instance::{StartProcessResult, START_FORM_STORAGE_KEY_VARIABLE};
use crate::domain::storage::{start_form_storage_key, FormDataStorage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Start Process Use Case
#[async_trait]
pub trait StartProcessUseCase: Send + Sync {
    /// Start an instance of the definition without any variables
    ///
    /// # Errors
    ///
    /// - Engine(NotFound): definition doesn't exist
    /// - Engine(..): any other engine failure, unchanged
    async fn start_process(&self, definition_id: &str) -> Result<StartProcessResult, ProcessError>;

    /// Validate and store a start form, then start an instance referencing it
    ///
    /// # Arguments
    ///
    /// * `definition_id` - Process definition to start
    /// * `payload` - Submitted form content
    /// * `access_token` - Caller's token, injected into the stored payload
    ///
    /// # Errors
    ///
    /// - MissingAccessToken: no usable token was supplied
    /// - StartForm: definition has no start form
    /// - Validation: validator rejected the payload
    /// - Storage: payload could not be stored
    /// - Engine / FormValidator: remote failures, unchanged
    async fn start_process_with_form(
        &self,
        definition_id: &str,
        payload: FormStartPayload,
        access_token: Option<String>,
    ) -> Result<StartProcessResult, ProcessError>;
}

/// Standard implementation of StartProcessUseCase
pub struct StandardStartProcessUseCase {
    engine: Arc<dyn ProcessEngine>,
    form_validator: Arc<dyn FormValidator>,
    storage: Arc<dyn FormDataStorage>,
}

impl StandardStartProcessUseCase {
    pub fn new(
        engine: Arc<dyn ProcessEngine>,
        form_validator: Arc<dyn FormValidator>,
        storage: Arc<dyn FormDataStorage>,
    ) -> Self {
        Self {
            engine,
            form_validator,
            storage,
        }
    }
}

#[async_trait]
impl StartProcessUseCase for StandardStartProcessUseCase {
    async fn start_process(&self, definition_id: &str) -> Result<StartProcessResult, ProcessError> {
        let definition = self.engine.get_definition(definition_id).await?;

        let started = self
            .engine
            .start_instance(&definition.id, HashMap::new())
            .await?;

        info!(
            "Started process instance {} of definition {}",
            started.id, started.definition_id
        );
        Ok(started.into())
    }

    async fn start_process_with_form(
        &self,
        definition_id: &str,
        payload: FormStartPayload,
        access_token: Option<String>,
    ) -> Result<StartProcessResult, ProcessError> {
        let access_token = access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or(ProcessError::MissingAccessToken)?;

        // Step 1: definition key namespaces the stored payload
        let definition = self.engine.get_definition(definition_id).await?;

        // Step 2: start form key selects the validation schema
        let form_key = self
            .engine
            .get_start_form_key(&definition.id)
            .await?
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                warn!("Process definition {} has no start form", definition.id);
                ProcessError::StartForm(definition.id.clone())
            })?;

        // Step 3: validate with the token already injected
        let payload = payload.with_access_token(access_token);
        match self.form_validator.validate(&form_key, &payload).await? {
            FormValidationOutcome::Valid => {
                debug!("Start form {} accepted for {}", form_key, definition.id);
            }
            FormValidationOutcome::Invalid(detail) => {
                warn!(
                    "Start form {} rejected for {}: {}",
                    form_key, definition.id, detail.code
                );
                return Err(ProcessError::Validation(detail));
            }
        }

        // Step 4: persist under a fresh key
        let storage_key =
            start_form_storage_key(&definition.key, &uuid::Uuid::new_v4().to_string());
        self.storage.put_form_data(&storage_key, &payload).await?;

        // Step 5: the engine only ever sees the reference
        let variables = HashMap::from([(
            START_FORM_STORAGE_KEY_VARIABLE.to_string(),
            VariableValue::string(storage_key.clone()),
        )]);
        let started = self.engine.start_instance(&definition.id, variables).await?;

        info!(
            "Started process instance {} of definition {} with start form stored at {}",
            started.id, started.definition_id, storage_key
        );
        Ok(started.into())
    }
}
