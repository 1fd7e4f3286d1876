//! SMS verification code life-cycle
//!
//! Orchestrates generation, throttled delivery, TTL-bound storage, and
//! single-use verification of one-time codes, over the [`SmsProvider`] and
//! [`CodeStore`] capability traits.

pub mod config;
pub mod entity;
pub mod service;
pub mod traits;

pub use config::VerificationConfig;
pub use entity::{VerificationCode, CODE_LENGTH};
pub use service::{SendOutcome, VerificationService};
pub use traits::{CodeStore, SmsProvider};

#[cfg(test)]
mod tests;
