//! Capability traits implemented by the infrastructure layer

use async_trait::async_trait;

use crate::errors::{ProviderError, StoreError};

/// Outbound SMS delivery capability
///
/// Each implementation builds and signs a request for one specific cloud
/// SMS backend (or logs the code, for the no-op variant). Dropping the
/// caller's future cancels an in-flight send.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Deliver a verification code to a phone number
    async fn send(&self, phone: &str, code: &str) -> Result<(), ProviderError>;

    /// Backend name for logs and diagnostics
    fn name(&self) -> &'static str;
}

/// Ephemeral TTL key-value store for codes and resend markers
///
/// Per-key operations are atomic; there are no cross-key transactions.
/// Entry expiry is entirely the store's responsibility.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Fetch a value, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value with a TTL in seconds
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), StoreError>;

    /// Remove a value; removing an absent key is not an error
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
