//! # Verigate Infrastructure
//!
//! Concrete implementations behind the `verigate_core` capability traits:
//!
//! - **SMS**: Tencent Cloud (TC3-HMAC-SHA256 canonical-request signing),
//!   Aliyun (HMAC-SHA1 query-string signing), and a no-op logging provider
//!   for environments without a real backend
//! - **Cache**: Redis-backed and in-memory TTL code stores
//! - **Config**: environment-driven provider selection and credentials

pub mod cache;
pub mod config;
pub mod sms;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
