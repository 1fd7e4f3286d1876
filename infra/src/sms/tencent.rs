//! Tencent Cloud SMS provider
//!
//! Implements the TC3-HMAC-SHA256 request signing scheme: a canonical
//! request over method, path, headers, and body digest is folded into a
//! string-to-sign, signed with a date/service-scoped key chain, and carried
//! in the `Authorization` header of a JSON POST.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use verigate_core::errors::ProviderError;
use verigate_core::phone::mask_phone;
use verigate_core::verification::SmsProvider;

use crate::config::TencentCredentials;

const ENDPOINT: &str = "https://sms.tencentcloudapi.com";
const HOST: &str = "sms.tencentcloudapi.com";
const ACTION: &str = "SendSms";
const VERSION: &str = "2021-01-11";
const SERVICE: &str = "sms";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";

type HmacSha256 = Hmac<Sha256>;

/// SMS provider backed by the Tencent Cloud SendSms API
pub struct TencentSmsProvider {
    credentials: TencentCredentials,
    http: reqwest::Client,
}

/// SendSms request body; field order is the serialized key order
#[derive(Serialize)]
struct SendSmsRequest<'a> {
    #[serde(rename = "PhoneNumberSet")]
    phone_number_set: [&'a str; 1],
    #[serde(rename = "SmsSdkAppId")]
    sms_sdk_app_id: &'a str,
    #[serde(rename = "TemplateId")]
    template_id: &'a str,
    #[serde(rename = "SignName")]
    sign_name: &'a str,
    #[serde(rename = "TemplateParamSet")]
    template_param_set: [&'a str; 1],
}

#[derive(Deserialize)]
struct ApiEnvelope {
    #[serde(rename = "Response")]
    response: Option<ApiResponse>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(rename = "Error")]
    error: Option<ApiError>,
    #[serde(rename = "RequestId")]
    request_id: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

impl TencentSmsProvider {
    /// Create a new Tencent Cloud SMS provider
    pub fn new(credentials: TencentCredentials, http: reqwest::Client) -> Self {
        Self { credentials, http }
    }

    /// Serialize the SendSms request body
    fn request_body(&self, phone: &str, code: &str) -> Result<String, ProviderError> {
        let request = SendSmsRequest {
            phone_number_set: [phone],
            sms_sdk_app_id: &self.credentials.sdk_app_id,
            template_id: &self.credentials.template_id,
            sign_name: &self.credentials.sign_name,
            template_param_set: [code],
        };
        serde_json::to_string(&request)
            .map_err(|e| ProviderError::with_source("failed to serialize SMS request", e))
    }

    /// Canonical request: method, path, empty query, canonical headers,
    /// signed header list, and the hex SHA-256 digest of the body
    fn canonical_request(body: &str) -> String {
        format!(
            "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
            CONTENT_TYPE,
            HOST,
            SIGNED_HEADERS,
            sha256_hex(body)
        )
    }

    fn string_to_sign(timestamp: i64, date: &str, canonical_request: &str) -> String {
        format!(
            "{}\n{}\n{}/{}/tc3_request\n{}",
            ALGORITHM,
            timestamp,
            date,
            SERVICE,
            sha256_hex(canonical_request)
        )
    }

    /// Derive the scoped signing key and sign the string-to-sign
    fn signature(&self, body: &str, timestamp: i64, date: &str) -> String {
        let canonical = Self::canonical_request(body);
        let string_to_sign = Self::string_to_sign(timestamp, date, &canonical);

        let secret_date = hmac_sha256(
            format!("TC3{}", self.credentials.secret_key).as_bytes(),
            date,
        );
        let secret_service = hmac_sha256(&secret_date, SERVICE);
        let secret_signing = hmac_sha256(&secret_service, "tc3_request");
        hex::encode(hmac_sha256(&secret_signing, &string_to_sign))
    }

    /// Build the `Authorization` header for a request body at a fixed
    /// timestamp/date (exposed at crate level for deterministic tests)
    pub(crate) fn authorization(&self, body: &str, timestamp: i64, date: &str) -> String {
        format!(
            "{} Credential={}/{}/{}/tc3_request, SignedHeaders={}, Signature={}",
            ALGORITHM,
            self.credentials.secret_id,
            date,
            SERVICE,
            SIGNED_HEADERS,
            self.signature(body, timestamp, date)
        )
    }
}

#[async_trait]
impl SmsProvider for TencentSmsProvider {
    async fn send(&self, phone: &str, code: &str) -> Result<(), ProviderError> {
        let body = self.request_body(phone, code)?;

        let now = Utc::now();
        let timestamp = now.timestamp();
        let date = now.format("%Y-%m-%d").to_string();
        let authorization = self.authorization(&body, timestamp, &date);

        let response = self
            .http
            .post(ENDPOINT)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", HOST)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Version", VERSION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("Authorization", authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::with_source("failed to send SMS request", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::new(format!(
                "SMS API returned status {}",
                status
            )));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::with_source("failed to parse SMS response", e))?;

        if let Some(api_response) = envelope.response {
            if let Some(error) = api_response.error {
                return Err(ProviderError::new(format!(
                    "SMS send failed: {} ({})",
                    error.message, error.code
                )));
            }
            debug!(
                phone = %mask_phone(phone),
                request_id = api_response.request_id.as_deref().unwrap_or(""),
                "Tencent SMS accepted"
            );
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "Tencent"
    }
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> TencentSmsProvider {
        TencentSmsProvider::new(
            TencentCredentials {
                secret_id: "AKIDEXAMPLE".to_string(),
                secret_key: "testsecretkey".to_string(),
                sdk_app_id: "1400000001".to_string(),
                sign_name: "TestSign".to_string(),
                template_id: "100001".to_string(),
            },
            reqwest::Client::new(),
        )
    }

    const TIMESTAMP: i64 = 1_700_000_000;
    const DATE: &str = "2023-11-14";

    #[test]
    fn test_request_body_layout() {
        let provider = test_provider();
        let body = provider.request_body("13800138000", "042193").unwrap();
        assert_eq!(
            body,
            r#"{"PhoneNumberSet":["13800138000"],"SmsSdkAppId":"1400000001","TemplateId":"100001","SignName":"TestSign","TemplateParamSet":["042193"]}"#
        );
    }

    #[test]
    fn test_canonical_request_golden() {
        let provider = test_provider();
        let body = provider.request_body("13800138000", "042193").unwrap();
        let canonical = TencentSmsProvider::canonical_request(&body);
        assert_eq!(
            canonical,
            "POST\n/\n\ncontent-type:application/json; charset=utf-8\nhost:sms.tencentcloudapi.com\n\ncontent-type;host\n9b30feb4f4d09db146f38d89c42832478e0f2346f5222f66f8bb6c40e0c8a8ec"
        );
        assert_eq!(
            sha256_hex(&canonical),
            "c789d621f5654ec1bb0596ebf888bdfae22964c41fe1da3e15159fafd5f9bc9b"
        );
    }

    #[test]
    fn test_authorization_golden() {
        let provider = test_provider();
        let body = provider.request_body("13800138000", "042193").unwrap();
        let authorization = provider.authorization(&body, TIMESTAMP, DATE);
        assert_eq!(
            authorization,
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2023-11-14/sms/tc3_request, \
             SignedHeaders=content-type;host, \
             Signature=3ad413f409fe8f9ed5f53d71b929db1584c188a6d4561c002073f66885c0f1b0"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let provider = test_provider();
        let body = provider.request_body("13800138000", "042193").unwrap();
        let first = provider.authorization(&body, TIMESTAMP, DATE);
        let second = provider.authorization(&body, TIMESTAMP, DATE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_signature_varies_with_timestamp() {
        let provider = test_provider();
        let body = provider.request_body("13800138000", "042193").unwrap();
        let a = provider.signature(&body, TIMESTAMP, DATE);
        let b = provider.signature(&body, TIMESTAMP + 1, DATE);
        assert_ne!(a, b);
    }

    #[test]
    fn test_error_envelope_parsing() {
        let json = r#"{"Response":{"Error":{"Code":"InvalidParameter","Message":"bad phone"},"RequestId":"abc"}}"#;
        let envelope: ApiEnvelope = serde_json::from_str(json).unwrap();
        let error = envelope.response.unwrap().error.unwrap();
        assert_eq!(error.code, "InvalidParameter");
        assert_eq!(error.message, "bad phone");

        let ok = r#"{"Response":{"RequestId":"abc"}}"#;
        let envelope: ApiEnvelope = serde_json::from_str(ok).unwrap();
        assert!(envelope.response.unwrap().error.is_none());
    }
}
