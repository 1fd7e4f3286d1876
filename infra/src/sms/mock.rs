//! No-op SMS provider
//!
//! Logs the code instead of transmitting it. Used in development and
//! whenever no real backend is configured.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use verigate_core::errors::ProviderError;
use verigate_core::phone::mask_phone;
use verigate_core::verification::SmsProvider;

/// SMS provider that logs instead of sending
#[derive(Clone)]
pub struct MockSmsProvider {
    send_count: Arc<AtomicU64>,
    simulate_failure: bool,
}

impl MockSmsProvider {
    /// Create a new no-op provider
    pub fn new() -> Self {
        Self {
            send_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a provider that fails every send (for testing)
    pub fn failing() -> Self {
        Self {
            send_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Number of sends performed
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

impl Default for MockSmsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsProvider for MockSmsProvider {
    async fn send(&self, phone: &str, code: &str) -> Result<(), ProviderError> {
        if self.simulate_failure {
            warn!(phone = %mask_phone(phone), "Mock SMS simulating delivery failure");
            return Err(ProviderError::new("simulated SMS delivery failure"));
        }

        let count = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            phone = %mask_phone(phone),
            code = code,
            total_sent = count,
            "Mock SMS: verification code logged instead of sent"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}
