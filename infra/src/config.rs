//! SMS configuration loaded from the environment
//!
//! Credential completeness is not enforced here; the provider factory
//! checks each backend's required fields and falls back to the no-op
//! provider when anything is missing.

use serde::{Deserialize, Serialize};

/// SMS service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Provider selector ("tencent", "aliyun", anything else is no-op)
    pub provider: String,
    /// Tencent Cloud credentials
    pub tencent: TencentCredentials,
    /// Aliyun credentials
    pub aliyun: AliyunCredentials,
}

/// Tencent Cloud SMS credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TencentCredentials {
    pub secret_id: String,
    pub secret_key: String,
    pub sdk_app_id: String,
    pub sign_name: String,
    pub template_id: String,
}

/// Aliyun SMS credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliyunCredentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub sign_name: String,
    pub template_code: String,
}

impl SmsConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `SMS_PROVIDER` (default "mock") plus the per-backend
    /// credential variables. A `.env` file is honored when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            provider: std::env::var("SMS_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            tencent: TencentCredentials {
                secret_id: env_or_default("SMS_TENCENT_SECRET_ID"),
                secret_key: env_or_default("SMS_TENCENT_SECRET_KEY"),
                sdk_app_id: env_or_default("SMS_TENCENT_SDK_APP_ID"),
                sign_name: env_or_default("SMS_TENCENT_SIGN_NAME"),
                template_id: env_or_default("SMS_TENCENT_TEMPLATE_ID"),
            },
            aliyun: AliyunCredentials {
                access_key_id: env_or_default("SMS_ALIYUN_ACCESS_KEY_ID"),
                access_key_secret: env_or_default("SMS_ALIYUN_ACCESS_KEY_SECRET"),
                sign_name: env_or_default("SMS_ALIYUN_SIGN_NAME"),
                template_code: env_or_default("SMS_ALIYUN_TEMPLATE_CODE"),
            },
        }
    }
}

impl TencentCredentials {
    /// Whether every required field is present
    pub fn is_complete(&self) -> bool {
        !self.secret_id.is_empty()
            && !self.secret_key.is_empty()
            && !self.sdk_app_id.is_empty()
            && !self.sign_name.is_empty()
            && !self.template_id.is_empty()
    }
}

impl AliyunCredentials {
    /// Whether every required field is present
    pub fn is_complete(&self) -> bool {
        !self.access_key_id.is_empty()
            && !self.access_key_secret.is_empty()
            && !self.sign_name.is_empty()
            && !self.template_code.is_empty()
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            tencent: TencentCredentials::default(),
            aliyun: AliyunCredentials::default(),
        }
    }
}

fn env_or_default(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}
