//! Send-and-verify walkthrough against the in-memory store
//!
//! Run with `cargo run --example send_code_demo -p verigate_infra`.
//! With no SMS credentials in the environment the factory selects the
//! no-op provider, which logs the code instead of sending it.

use std::sync::Arc;

use verigate_core::phone::{is_valid_mobile, normalize_phone};
use verigate_core::verification::{CodeStore, VerificationConfig, VerificationService};
use verigate_infra::cache::MemoryCodeStore;
use verigate_infra::config::SmsConfig;
use verigate_infra::sms::create_sms_provider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let phone = normalize_phone("138-0013-8000");
    assert!(is_valid_mobile(&phone));

    let provider = create_sms_provider(&SmsConfig::from_env());
    let store = Arc::new(MemoryCodeStore::new());
    let service = VerificationService::new(
        provider,
        Arc::clone(&store),
        VerificationConfig::default(),
    );

    let outcome = service.send_code(&phone).await?;
    println!(
        "code sent to {}, valid until {}, next resend at {}",
        phone, outcome.verification_code.expires_at, outcome.next_resend_at
    );

    // A real caller gets the code from the SMS; here we read it back
    let code = store
        .get(&format!("sms_code_{}", phone))
        .await?
        .expect("code should be stored");

    service.verify_code(&phone, &code).await?;
    println!("code {} verified", code);

    Ok(())
}
