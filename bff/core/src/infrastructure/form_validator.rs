// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Form Validator HTTP Client
//!
//! Implements [`FormValidator`] against the form-management service:
//! `POST {url}/api/form-submissions/{formKey}/validate`.
//!
//! | Response | Outcome |
//! |----------|---------|
//! | 200 | `Valid` |
//! | 422 with error body | `Invalid(detail)` |
//! | anything else | `FormValidatorError` |

use crate::domain::form::{
    FormStartPayload, FormValidationOutcome, FormValidator, FormValidatorError,
    ValidationErrorDetail,
};
use crate::infrastructure::url_path::encode_segment;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub struct HttpFormValidator {
    client: Client,
    base_url: String,
}

impl HttpFormValidator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FormValidatorError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            FormValidatorError::Unavailable(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FormValidator for HttpFormValidator {
    async fn validate(
        &self,
        form_key: &str,
        payload: &FormStartPayload,
    ) -> Result<FormValidationOutcome, FormValidatorError> {
        let segment = encode_segment(form_key)
            .ok_or_else(|| FormValidatorError::InvalidFormKey(form_key.to_string()))?;
        let url = format!(
            "{}/api/form-submissions/{}/validate",
            self.base_url, segment
        );
        debug!("Validating start form {}", form_key);

        let response = self.client.post(&url).json(payload).send().await?;

        match response.status() {
            status if status.is_success() => Ok(FormValidationOutcome::Valid),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let detail: ValidationErrorDetail = response
                    .json()
                    .await
                    .map_err(|e| FormValidatorError::Serialization(e.to_string()))?;
                Ok(FormValidationOutcome::Invalid(detail))
            }
            status if status.is_server_error() => Err(FormValidatorError::Unavailable(format!(
                "HTTP {}",
                status
            ))),
            status => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("HTTP {}", status));
                Err(FormValidatorError::Unexpected {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
