//! SMS provider implementations and selection
//!
//! Each backend implements `verigate_core`'s [`SmsProvider`] trait with its
//! own request-signing protocol; [`create_sms_provider`] picks one from
//! configuration and degrades to the no-op variant when credentials are
//! missing or the selector is unknown.

use std::sync::Arc;

use tracing::{info, warn};

use verigate_core::verification::SmsProvider;

use crate::config::SmsConfig;

pub mod aliyun;
pub mod mock;
pub mod tencent;

pub use aliyun::AliyunSmsProvider;
pub use mock::MockSmsProvider;
pub use tencent::TencentSmsProvider;

#[cfg(test)]
mod tests;

/// Select and construct an SMS provider from configuration
///
/// Performs no network I/O. Incomplete credentials or an unrecognized
/// selector never fail construction; both fall back to the no-op provider
/// with a warning.
pub fn create_sms_provider(config: &SmsConfig) -> Arc<dyn SmsProvider> {
    let http = reqwest::Client::new();

    match config.provider.as_str() {
        "tencent" => {
            if !config.tencent.is_complete() {
                warn!("Tencent SMS config incomplete, falling back to mock provider");
                return Arc::new(MockSmsProvider::new());
            }
            info!("Using Tencent Cloud SMS provider");
            Arc::new(TencentSmsProvider::new(config.tencent.clone(), http))
        }
        "aliyun" => {
            if !config.aliyun.is_complete() {
                warn!("Aliyun SMS config incomplete, falling back to mock provider");
                return Arc::new(MockSmsProvider::new());
            }
            info!("Using Aliyun SMS provider");
            Arc::new(AliyunSmsProvider::new(config.aliyun.clone(), http))
        }
        "mock" => Arc::new(MockSmsProvider::new()),
        other => {
            warn!(provider = other, "Unknown SMS provider, using mock provider");
            Arc::new(MockSmsProvider::new())
        }
    }
}
