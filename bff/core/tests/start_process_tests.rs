//! Integration tests for starting process instances with and without a
//! start form.
//!
//! Covers call order, short-circuiting on every failure, and the single
//! storage-key variable handed to the engine.

mod common;

use bff_core::application::{ProcessError, StandardStartProcessUseCase, StartProcessUseCase};
use bff_core::domain::engine::EngineError;
use bff_core::domain::form::{
    FormStartPayload, FormValidationOutcome, FormValidatorError, ValidationErrorDetail,
};
use bff_core::domain::process_instance::START_FORM_STORAGE_KEY_VARIABLE;
use common::*;
use std::collections::HashMap;
use std::sync::Arc;

const DEFINITION_ID: &str = "add-lab:1:1";

struct Fixture {
    log: CallLog,
    engine: Arc<MockEngine>,
    validator: Arc<MockValidator>,
    storage: Arc<MockStorage>,
    use_case: StandardStartProcessUseCase,
}

fn engine(log: &CallLog, form_key: Option<&str>) -> MockEngine {
    let mut engine = MockEngine::new(log.clone());
    engine.definitions = vec![definition(DEFINITION_ID, "add-lab")];
    engine.start_form_keys = HashMap::from([(
        DEFINITION_ID.to_string(),
        form_key.map(str::to_string),
    )]);
    engine
}

fn fixture(form_key: Option<&str>, outcome: FormValidationOutcome, storage_fails: bool) -> Fixture {
    let log = call_log();
    let engine = engine(&log, form_key);
    let validator = MockValidator::new(log.clone(), outcome);
    let storage = if storage_fails {
        MockStorage::failing(log.clone())
    } else {
        MockStorage::new(log.clone())
    };
    assemble(log, engine, validator, storage)
}

fn assemble(
    log: CallLog,
    engine: MockEngine,
    validator: MockValidator,
    storage: MockStorage,
) -> Fixture {
    let engine = Arc::new(engine);
    let validator = Arc::new(validator);
    let storage = Arc::new(storage);

    let use_case = StandardStartProcessUseCase::new(engine.clone(), validator.clone(), storage.clone());
    Fixture {
        log,
        engine,
        validator,
        storage,
        use_case,
    }
}

fn payload() -> FormStartPayload {
    FormStartPayload::new(serde_json::json!({"name": "Central lab", "edrpou": "12345678"}))
}

fn rejection() -> ValidationErrorDetail {
    serde_json::from_value(serde_json::json!({
        "traceId": "trace-1",
        "code": "VALIDATION_ERROR",
        "details": {"errors": [{"field": "edrpou", "value": "1", "message": "too short"}]}
    }))
    .unwrap()
}

#[tokio::test]
async fn test_valid_form_runs_steps_in_order() {
    let f = fixture(Some("add-lab-form"), FormValidationOutcome::Valid, false);

    let result = f
        .use_case
        .start_process_with_form(DEFINITION_ID, payload(), Some("token-1".to_string()))
        .await
        .unwrap();

    assert_eq!(result.id, "instance-1");
    assert_eq!(result.process_definition_id, DEFINITION_ID);
    assert!(!result.ended);

    let calls = calls(&f.log);
    assert_eq!(calls.len(), 5, "unexpected calls: {:?}", calls);
    assert_eq!(calls[0], format!("engine.get_definition:{}", DEFINITION_ID));
    assert_eq!(calls[1], format!("engine.get_start_form_key:{}", DEFINITION_ID));
    assert_eq!(calls[2], "validator.validate:add-lab-form");
    assert!(calls[3].starts_with("storage.put:process-definition/add-lab/start-form/"));
    assert_eq!(calls[4], format!("engine.start_instance:{}", DEFINITION_ID));
}

#[tokio::test]
async fn test_engine_receives_only_the_storage_key() {
    let f = fixture(Some("add-lab-form"), FormValidationOutcome::Valid, false);

    f.use_case
        .start_process_with_form(DEFINITION_ID, payload(), Some("token-1".to_string()))
        .await
        .unwrap();

    let written = f.storage.written.lock().unwrap();
    assert_eq!(written.len(), 1);
    let (key, stored) = &written[0];

    let submission_id = key
        .strip_prefix("process-definition/add-lab/start-form/")
        .expect("storage key layout");
    assert!(uuid::Uuid::parse_str(submission_id).is_ok());
    assert_eq!(stored.access_token.as_deref(), Some("token-1"));
    assert_eq!(stored.data["edrpou"], "12345678");

    let started = f.engine.started.lock().unwrap();
    assert_eq!(started.len(), 1);
    let (definition_id, variables) = &started[0];
    assert_eq!(definition_id, DEFINITION_ID);
    assert_eq!(variables.len(), 1);
    assert_eq!(
        variables[START_FORM_STORAGE_KEY_VARIABLE].value,
        serde_json::json!(key)
    );
    assert_eq!(variables[START_FORM_STORAGE_KEY_VARIABLE].value_type, "String");
}

#[tokio::test]
async fn test_validator_sees_injected_token() {
    let f = fixture(Some("add-lab-form"), FormValidationOutcome::Valid, false);
    let submitted = payload().with_access_token("forged");

    f.use_case
        .start_process_with_form(DEFINITION_ID, submitted, Some("token-1".to_string()))
        .await
        .unwrap();

    let received = f.validator.received.lock().unwrap();
    assert_eq!(received[0].1.access_token.as_deref(), Some("token-1"));
}

#[tokio::test]
async fn test_missing_start_form_stops_before_validation() {
    for form_key in [None, Some("")] {
        let f = fixture(form_key, FormValidationOutcome::Valid, false);

        let err = f
            .use_case
            .start_process_with_form(DEFINITION_ID, payload(), Some("token-1".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::StartForm(ref id) if id == DEFINITION_ID));
        assert_eq!(count_calls(&f.log, "validator."), 0);
        assert_eq!(count_calls(&f.log, "storage."), 0);
        assert_eq!(count_calls(&f.log, "engine.start_instance"), 0);
    }
}

#[tokio::test]
async fn test_invalid_form_is_not_stored_or_started() {
    let f = fixture(
        Some("add-lab-form"),
        FormValidationOutcome::Invalid(rejection()),
        false,
    );

    let err = f
        .use_case
        .start_process_with_form(DEFINITION_ID, payload(), Some("token-1".to_string()))
        .await
        .unwrap_err();

    match err {
        ProcessError::Validation(detail) => assert_eq!(detail, rejection()),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(count_calls(&f.log, "validator."), 1);
    assert_eq!(count_calls(&f.log, "storage."), 0);
    assert_eq!(count_calls(&f.log, "engine.start_instance"), 0);
}

#[tokio::test]
async fn test_storage_failure_prevents_start() {
    let f = fixture(Some("add-lab-form"), FormValidationOutcome::Valid, true);

    let err = f
        .use_case
        .start_process_with_form(DEFINITION_ID, payload(), Some("token-1".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessError::Storage(_)));
    assert_eq!(count_calls(&f.log, "storage."), 1);
    assert_eq!(count_calls(&f.log, "engine.start_instance"), 0);
}

#[tokio::test]
async fn test_validator_failure_is_not_stored_or_started() {
    let log = call_log();
    let f = assemble(
        log.clone(),
        engine(&log, Some("add-lab-form")),
        MockValidator::failing(log.clone()),
        MockStorage::new(log.clone()),
    );

    let err = f
        .use_case
        .start_process_with_form(DEFINITION_ID, payload(), Some("token-1".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProcessError::FormValidator(FormValidatorError::Unavailable(_))
    ));
    assert_eq!(count_calls(&f.log, "validator."), 1);
    assert_eq!(count_calls(&f.log, "storage."), 0);
    assert_eq!(count_calls(&f.log, "engine.start_instance"), 0);
    assert!(f.storage.written.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_engine_start_failure_after_storage_write() {
    let log = call_log();
    let mut failing_engine = engine(&log, Some("add-lab-form"));
    failing_engine.fail_start = true;
    let f = assemble(
        log.clone(),
        failing_engine,
        MockValidator::new(log.clone(), FormValidationOutcome::Valid),
        MockStorage::new(log.clone()),
    );

    let err = f
        .use_case
        .start_process_with_form(DEFINITION_ID, payload(), Some("token-1".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProcessError::Engine(EngineError::Unavailable(_))
    ));
    let calls = calls(&f.log);
    assert_eq!(calls.len(), 5, "unexpected calls: {:?}", calls);
    assert!(calls[3].starts_with("storage.put:"));
    assert_eq!(calls[4], format!("engine.start_instance:{}", DEFINITION_ID));
    assert_eq!(f.storage.written.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_definition_is_not_found() {
    let f = fixture(Some("add-lab-form"), FormValidationOutcome::Valid, false);

    let err = f
        .use_case
        .start_process_with_form("missing", payload(), Some("token-1".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessError::Engine(EngineError::NotFound(_))));
    assert_eq!(calls(&f.log).len(), 1);
}

#[tokio::test]
async fn test_missing_access_token_rejected_first() {
    for token in [None, Some("  ".to_string())] {
        let f = fixture(Some("add-lab-form"), FormValidationOutcome::Valid, false);

        let err = f
            .use_case
            .start_process_with_form(DEFINITION_ID, payload(), token)
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::MissingAccessToken));
        assert!(calls(&f.log).is_empty());
    }
}

#[tokio::test]
async fn test_start_without_form_passes_no_variables() {
    let f = fixture(None, FormValidationOutcome::Valid, false);

    let result = f.use_case.start_process(DEFINITION_ID).await.unwrap();

    assert_eq!(result.id, "instance-1");
    assert_eq!(
        calls(&f.log),
        vec![
            format!("engine.get_definition:{}", DEFINITION_ID),
            format!("engine.start_instance:{}", DEFINITION_ID),
        ]
    );
    assert!(f.engine.started.lock().unwrap()[0].1.is_empty());
}

#[tokio::test]
async fn test_start_without_form_unknown_definition() {
    let f = fixture(None, FormValidationOutcome::Valid, false);

    let err = f.use_case.start_process("missing").await.unwrap_err();

    assert!(matches!(err, ProcessError::Engine(EngineError::NotFound(_))));
    assert_eq!(count_calls(&f.log, "engine.start_instance"), 0);
}
