//! Life-cycle tests for the verification service

use std::sync::Arc;

use chrono::Duration;

use super::mocks::{RecordingProvider, TestStore};
use crate::errors::VerificationError;
use crate::verification::config::VerificationConfig;
use crate::verification::service::VerificationService;

const PHONE: &str = "13800138000";

fn service(
    provider: RecordingProvider,
    store: TestStore,
) -> (
    VerificationService<RecordingProvider, TestStore>,
    Arc<RecordingProvider>,
    Arc<TestStore>,
) {
    let provider = Arc::new(provider);
    let store = Arc::new(store);
    let service = VerificationService::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        VerificationConfig::default(),
    );
    (service, provider, store)
}

/// A wrong code that is guaranteed to differ from `code`
fn wrong_code(code: &str) -> &'static str {
    if code == "000000" {
        "000001"
    } else {
        "000000"
    }
}

#[tokio::test]
async fn test_send_then_verify_succeeds_exactly_once() {
    let (service, provider, store) = service(RecordingProvider::new(), TestStore::new());

    let outcome = service.send_code(PHONE).await.unwrap();
    let code = provider.last_code().expect("provider should have been called");
    assert_eq!(code, outcome.verification_code.code);
    assert!(store.contains("sms_code_13800138000"));

    service.verify_code(PHONE, &code).await.unwrap();
    assert!(!store.contains("sms_code_13800138000"));

    // The consumed code cannot be replayed
    let err = service.verify_code(PHONE, &code).await.unwrap_err();
    assert!(matches!(err, VerificationError::CodeNotFoundOrExpired));
}

#[tokio::test]
async fn test_second_send_is_throttled() {
    let (service, provider, _store) = service(RecordingProvider::new(), TestStore::new());

    service.send_code(PHONE).await.unwrap();
    let err = service.send_code(PHONE).await.unwrap_err();

    assert!(matches!(err, VerificationError::Throttled));
    assert_eq!(err.code(), "RATE_LIMIT_EXCEEDED");
    // No second delivery attempt was made
    assert_eq!(provider.sent().len(), 1);
}

#[tokio::test]
async fn test_send_allowed_again_after_marker_expires() {
    let (service, provider, store) = service(RecordingProvider::new(), TestStore::new());

    service.send_code(PHONE).await.unwrap();
    let first_code = provider.last_code().unwrap();

    store.expire("sms_code_13800138000_sent");
    service.send_code(PHONE).await.unwrap();
    let second_code = provider.last_code().unwrap();
    assert_eq!(provider.sent().len(), 2);

    // The newer code overwrote the older one
    if first_code != second_code {
        let err = service.verify_code(PHONE, &first_code).await.unwrap_err();
        assert!(matches!(err, VerificationError::CodeMismatch));
    }
    service.verify_code(PHONE, &second_code).await.unwrap();
}

#[tokio::test]
async fn test_wrong_code_leaves_stored_code_intact() {
    let (service, provider, _store) = service(RecordingProvider::new(), TestStore::new());

    service.send_code(PHONE).await.unwrap();
    let code = provider.last_code().unwrap();

    let err = service
        .verify_code(PHONE, wrong_code(&code))
        .await
        .unwrap_err();
    assert!(matches!(err, VerificationError::CodeMismatch));

    // A correct attempt within the TTL still succeeds
    service.verify_code(PHONE, &code).await.unwrap();
}

#[tokio::test]
async fn test_verify_without_prior_send() {
    let (service, _provider, _store) = service(RecordingProvider::new(), TestStore::new());

    let err = service.verify_code(PHONE, "123456").await.unwrap_err();
    assert!(matches!(err, VerificationError::CodeNotFoundOrExpired));
    assert_eq!(err.code(), "CODE_NOT_FOUND_OR_EXPIRED");
}

#[tokio::test]
async fn test_provider_failure_surfaces_generic_error() {
    let (service, _provider, store) = service(RecordingProvider::failing(), TestStore::new());

    let err = service.send_code(PHONE).await.unwrap_err();
    assert!(matches!(err, VerificationError::Delivery));
    assert_eq!(err.to_string(), "Failed to send verification code");

    // Nothing was persisted for the failed send
    assert!(!store.contains("sms_code_13800138000"));
    assert!(!store.contains("sms_code_13800138000_sent"));
}

#[tokio::test]
async fn test_marker_write_failure_is_non_fatal() {
    let store = TestStore::new();
    store.fail_set_for("sms_code_13800138000_sent");
    let (service, provider, store) = service(RecordingProvider::new(), store);

    // The SMS went out and the code was stored, so the send succeeds
    let outcome = service.send_code(PHONE).await.unwrap();
    assert!(store.contains("sms_code_13800138000"));
    assert!(!store.contains("sms_code_13800138000_sent"));

    service
        .verify_code(PHONE, &outcome.verification_code.code)
        .await
        .unwrap();
    assert_eq!(provider.sent().len(), 1);
}

#[tokio::test]
async fn test_code_store_failure_fails_send() {
    let store = TestStore::new();
    store.fail_set_for("sms_code_13800138000");
    let (service, _provider, _store) = service(RecordingProvider::new(), store);

    let err = service.send_code(PHONE).await.unwrap_err();
    assert!(matches!(err, VerificationError::Internal));
}

#[tokio::test]
async fn test_send_outcome_windows() {
    let (service, _provider, _store) = service(RecordingProvider::new(), TestStore::new());

    let outcome = service.send_code(PHONE).await.unwrap();
    let issued = &outcome.verification_code;

    assert_eq!(issued.phone, PHONE);
    assert_eq!(issued.code.len(), 6);
    assert!(issued.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(issued.expires_at, issued.created_at + Duration::seconds(300));
    assert_eq!(outcome.next_resend_at, issued.created_at + Duration::seconds(60));
}
