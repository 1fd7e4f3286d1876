//! Verification service configuration

/// Tunables for the verification code life-cycle
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Seconds a stored code stays valid
    pub code_ttl_seconds: u64,
    /// Seconds a phone must wait between sends
    pub resend_interval_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 300,
            resend_interval_seconds: 60,
        }
    }
}
