// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Start Forms
//!
//! Submitted start-form payloads and the port to the remote form validator.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Form payload value object and validator contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Submitted start-form content.
///
/// `data` is opaque to the BFF. The access token is always injected by the
/// BFF from the authenticated request, never taken from the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStartPayload {
    #[serde(default)]
    pub data: serde_json::Value,

    #[serde(
        rename = "x-access-token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,
}

impl FormStartPayload {
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data,
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// Field-level detail of a rejected submission, kept as the validator sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "traceId")]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub message: String,
}

/// Verdict of the form validator.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValidationOutcome {
    Valid,
    Invalid(ValidationErrorDetail),
}

/// Remote form validator
#[async_trait]
pub trait FormValidator: Send + Sync {
    /// Validate `payload` against the schema registered under `form_key`.
    ///
    /// An invalid submission is `Ok(Invalid(..))`; `Err` is reserved for
    /// failures to reach or understand the validator.
    async fn validate(
        &self,
        form_key: &str,
        payload: &FormStartPayload,
    ) -> Result<FormValidationOutcome, FormValidatorError>;
}

#[derive(Debug, Error)]
pub enum FormValidatorError {
    #[error("Form validator unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid form key: {0:?}")]
    InvalidFormKey(String),

    #[error("Form validator returned HTTP {status}: {message}")]
    Unexpected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for FormValidatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FormValidatorError::Serialization(err.to_string())
        } else {
            FormValidatorError::Network(err.to_string())
        }
    }
}
