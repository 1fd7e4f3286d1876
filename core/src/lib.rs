//! # Verigate Core
//!
//! Domain layer for the Verigate SMS verification service. This crate owns
//! the code life-cycle (generation, throttled sending, single-use
//! verification), the phone number utilities, and the capability traits
//! the infrastructure layer implements:
//!
//! - [`verification::SmsProvider`] - outbound code delivery
//! - [`verification::CodeStore`] - ephemeral TTL key-value storage
//!
//! The crate performs no network or cache I/O itself; concrete providers
//! and stores live in `verigate_infra`.

pub mod errors;
pub mod phone;
pub mod verification;

pub use errors::{ProviderError, StoreError, VerificationError};
pub use verification::{
    CodeStore, SendOutcome, SmsProvider, VerificationCode, VerificationConfig,
    VerificationService,
};
