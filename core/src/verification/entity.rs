//! Verification code entity

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a verification code
pub const CODE_LENGTH: usize = 6;

/// A one-time code issued to a phone number
///
/// At most one live code exists per phone at any instant; a newer send
/// overwrites the previous entry in the store. The code is consumed
/// (deleted) on successful verification, otherwise it expires via TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Phone number this code was issued to (digits only)
    pub phone: String,

    /// The 6-digit zero-padded code
    pub code: String,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Issue a new code for a phone number with the given time-to-live
    pub fn new(phone: String, ttl_seconds: u64) -> Self {
        let now = Utc::now();
        Self {
            phone,
            code: Self::generate_code(),
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Generate a pseudorandom 6-digit zero-padded code
    ///
    /// Uniform over 000000-999999.
    pub fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        let code: u32 = rng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    /// Whether the code's validity window has elapsed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
