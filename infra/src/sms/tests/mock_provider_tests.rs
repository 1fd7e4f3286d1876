//! Unit tests for the no-op provider

use verigate_core::verification::SmsProvider;

use crate::sms::MockSmsProvider;

#[tokio::test]
async fn test_mock_send_always_succeeds() {
    let provider = MockSmsProvider::new();

    provider.send("13800138000", "042193").await.unwrap();
    provider.send("13800138000", "123456").await.unwrap();

    assert_eq!(provider.send_count(), 2);
    assert_eq!(provider.name(), "Mock");
}

#[tokio::test]
async fn test_failing_mock_reports_error() {
    let provider = MockSmsProvider::failing();

    let err = provider.send("13800138000", "042193").await.unwrap_err();
    assert!(err.to_string().contains("simulated"));
    assert_eq!(provider.send_count(), 0);
}
