//! Error types for the verification domain
//!
//! User-facing errors carry a stable code via [`VerificationError::code`];
//! delivery and storage failures keep their underlying cause for logging at
//! the call site but never expose it to the end caller.

use thiserror::Error;

/// Errors surfaced by the verification service
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Invalid phone number format: {phone}")]
    InvalidPhone { phone: String },

    #[error("Verification code requested too frequently, please retry later")]
    Throttled,

    #[error("Failed to send verification code")]
    Delivery,

    #[error("Verification code expired or not found")]
    CodeNotFoundOrExpired,

    #[error("Incorrect verification code")]
    CodeMismatch,

    #[error("Internal verification error")]
    Internal,
}

impl VerificationError {
    /// Stable error code for programmatic handling by callers
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::InvalidPhone { .. } => "INVALID_PHONE_FORMAT",
            VerificationError::Throttled => "RATE_LIMIT_EXCEEDED",
            VerificationError::Delivery => "SMS_DELIVERY_FAILED",
            VerificationError::CodeNotFoundOrExpired => "CODE_NOT_FOUND_OR_EXPIRED",
            VerificationError::CodeMismatch => "CODE_MISMATCH",
            VerificationError::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Delivery failure reported by an SMS provider
///
/// Wraps every failure mode of a send attempt (request serialization,
/// transport, non-200 status, response parsing, provider-reported error)
/// with the underlying cause attached for logging only.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Create a provider error with a message only
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a provider error wrapping an underlying cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The provider-side failure description
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure reported by a code store implementation
#[derive(Error, Debug)]
#[error("code store error: {0}")]
pub struct StoreError(pub String);
