// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application errors
//!
//! Union of the port errors plus the two failures that only exist at this
//! layer: a definition without a start form, and a start-form submission
//! without an access token. Port errors are wrapped, never reclassified.

use crate::domain::engine::EngineError;
use crate::domain::form::{FormValidatorError, ValidationErrorDetail};
use crate::domain::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Start form is not defined for process definition {0}")]
    StartForm(String),

    #[error("Submitted form data is invalid")]
    Validation(ValidationErrorDetail),

    #[error("Access token is required to submit a start form")]
    MissingAccessToken,

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Form validator error: {0}")]
    FormValidator(#[from] FormValidatorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_keeps_classification() {
        let err: ProcessError = EngineError::NotFound("process-definition x".to_string()).into();
        assert!(matches!(err, ProcessError::Engine(EngineError::NotFound(_))));

        let err: ProcessError = EngineError::Unavailable("503".to_string()).into();
        assert!(matches!(err, ProcessError::Engine(EngineError::Unavailable(_))));
    }

    #[test]
    fn test_start_form_message() {
        let err = ProcessError::StartForm("add-lab:1:abc".to_string());
        assert_eq!(
            err.to_string(),
            "Start form is not defined for process definition add-lab:1:abc"
        );
    }
}
