//! Verification service implementation

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use tracing::{error, info, warn};

use crate::errors::VerificationError;
use crate::phone::mask_phone;

use super::config::VerificationConfig;
use super::entity::VerificationCode;
use super::traits::{CodeStore, SmsProvider};

/// Key prefix shared by code and resend-marker entries
const CODE_KEY_PREFIX: &str = "sms_code_";

/// Result of a successful send
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// The issued code and its validity window
    pub verification_code: VerificationCode,
    /// Earliest instant a new code may be requested for this phone
    pub next_resend_at: DateTime<Utc>,
}

/// Orchestrates the one-time code life-cycle for phone numbers
///
/// Holds no state of its own beyond configuration; the shared [`CodeStore`]
/// is the only mutable resource. The resend throttle is best-effort: two
/// concurrent sends for the same phone can race between the marker check
/// and the marker write, and no cross-call locking is performed.
pub struct VerificationService<P: SmsProvider + ?Sized, S: CodeStore + ?Sized> {
    provider: Arc<P>,
    store: Arc<S>,
    config: VerificationConfig,
}

impl<P: SmsProvider + ?Sized, S: CodeStore + ?Sized> VerificationService<P, S> {
    /// Create a new verification service
    pub fn new(provider: Arc<P>, store: Arc<S>, config: VerificationConfig) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Issue and deliver a new verification code
    ///
    /// Fails with [`VerificationError::Throttled`] while the resend marker
    /// from a previous send is still live, and with
    /// [`VerificationError::Delivery`] when the provider rejects the send
    /// (the generated code is never surfaced in that case). A marker-write
    /// failure after a successful delivery is logged but does not fail the
    /// call, since the message is already out.
    pub async fn send_code(&self, phone: &str) -> Result<SendOutcome, VerificationError> {
        let marker_key = Self::marker_key(phone);

        let marker = self.store.get(&marker_key).await.map_err(|e| {
            error!(phone = %mask_phone(phone), error = %e, "Failed to read resend marker");
            VerificationError::Internal
        })?;
        if marker.is_some() {
            warn!(
                phone = %mask_phone(phone),
                event = "send_throttled",
                "Verification code requested within resend window"
            );
            return Err(VerificationError::Throttled);
        }

        let verification_code =
            VerificationCode::new(phone.to_string(), self.config.code_ttl_seconds);

        if let Err(e) = self
            .provider
            .send(phone, &verification_code.code)
            .await
        {
            // Full detail stays in the logs; the caller gets a generic error
            error!(
                phone = %mask_phone(phone),
                error = ?e,
                event = "send_failed",
                "SMS provider failed to deliver verification code"
            );
            return Err(VerificationError::Delivery);
        }

        self.store
            .set(
                &Self::code_key(phone),
                &verification_code.code,
                self.config.code_ttl_seconds,
            )
            .await
            .map_err(|e| {
                error!(
                    phone = %mask_phone(phone),
                    error = %e,
                    event = "code_store_failed",
                    "Failed to store verification code"
                );
                VerificationError::Internal
            })?;

        // Non-fatal: the SMS was already delivered
        if let Err(e) = self
            .store
            .set(
                &marker_key,
                &verification_code.created_at.timestamp().to_string(),
                self.config.resend_interval_seconds,
            )
            .await
        {
            warn!(
                phone = %mask_phone(phone),
                error = %e,
                "Failed to record resend marker"
            );
        }

        info!(
            phone = %mask_phone(phone),
            event = "code_sent",
            ttl_seconds = self.config.code_ttl_seconds,
            "Verification code sent"
        );

        let next_resend_at = verification_code.created_at
            + Duration::seconds(self.config.resend_interval_seconds as i64);
        Ok(SendOutcome {
            verification_code,
            next_resend_at,
        })
    }

    /// Verify a submitted code against the stored one
    ///
    /// A matching code is deleted before returning, so a code verifies
    /// successfully at most once. A mismatch leaves the stored code in
    /// place for further attempts within its TTL.
    pub async fn verify_code(&self, phone: &str, submitted: &str) -> Result<(), VerificationError> {
        let code_key = Self::code_key(phone);

        let stored = self.store.get(&code_key).await.map_err(|e| {
            error!(phone = %mask_phone(phone), error = %e, "Failed to read verification code");
            VerificationError::Internal
        })?;

        let stored = match stored {
            Some(code) => code,
            None => {
                warn!(
                    phone = %mask_phone(phone),
                    event = "verify_missing",
                    "Verification attempted with no live code"
                );
                return Err(VerificationError::CodeNotFoundOrExpired);
            }
        };

        if !Self::codes_match(&stored, submitted) {
            warn!(
                phone = %mask_phone(phone),
                event = "verify_mismatch",
                "Verification code mismatch"
            );
            return Err(VerificationError::CodeMismatch);
        }

        // Single use: delete before reporting success
        if let Err(e) = self.store.delete(&code_key).await {
            warn!(
                phone = %mask_phone(phone),
                error = %e,
                "Failed to delete consumed verification code"
            );
        }

        info!(
            phone = %mask_phone(phone),
            event = "code_verified",
            "Verification code accepted"
        );
        Ok(())
    }

    /// Constant-time code comparison
    fn codes_match(stored: &str, submitted: &str) -> bool {
        if stored.len() != submitted.len() {
            return false;
        }
        constant_time_eq(stored.as_bytes(), submitted.as_bytes())
    }

    fn code_key(phone: &str) -> String {
        format!("{}{}", CODE_KEY_PREFIX, phone)
    }

    fn marker_key(phone: &str) -> String {
        format!("{}{}_sent", CODE_KEY_PREFIX, phone)
    }
}
