//! Aliyun SMS provider
//!
//! Implements the HMAC-SHA1 query-string signing scheme: the full
//! parameter set is sorted, percent-encoded with Aliyun's reserved
//! character rules, folded into `GET&%2F&<encoded query>`, and signed with
//! the access key secret suffixed by `&`. The signature travels as a
//! `Signature` query parameter on a GET request.

use std::collections::BTreeMap;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use sha1::Sha1;
use tracing::debug;

use verigate_core::errors::ProviderError;
use verigate_core::phone::mask_phone;
use verigate_core::verification::SmsProvider;

use crate::config::AliyunCredentials;

const ENDPOINT: &str = "https://dysmsapi.aliyuncs.com";
const ACTION: &str = "SendSms";
const VERSION: &str = "2017-05-25";
const REGION_ID: &str = "cn-hangzhou";

/// Aliyun keeps the RFC 3986 unreserved characters bare and encodes
/// everything else, including `*` (as `%2A`) and space (as `%20`); `~`
/// stays bare. Generic form encoders diverge on exactly these characters.
const ALIYUN_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// SMS provider backed by the Aliyun Dysms SendSms API
pub struct AliyunSmsProvider {
    credentials: AliyunCredentials,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Message")]
    message: Option<String>,
}

impl AliyunSmsProvider {
    /// Create a new Aliyun SMS provider
    pub fn new(credentials: AliyunCredentials, http: reqwest::Client) -> Self {
        Self { credentials, http }
    }

    /// Assemble the sorted, signed query string for one send at a fixed
    /// timestamp/nonce (exposed at crate level for deterministic tests)
    pub(crate) fn signed_query(
        &self,
        phone: &str,
        code: &str,
        timestamp: &str,
        nonce: &str,
    ) -> String {
        let template_param = format!(r#"{{"code":"{}"}}"#, code);

        // BTreeMap iteration is lexicographic, which is exactly the
        // parameter order the signature requires
        let mut params: BTreeMap<&str, &str> = BTreeMap::new();
        params.insert("AccessKeyId", &self.credentials.access_key_id);
        params.insert("Action", ACTION);
        params.insert("Format", "JSON");
        params.insert("PhoneNumbers", phone);
        params.insert("RegionId", REGION_ID);
        params.insert("SignName", &self.credentials.sign_name);
        params.insert("SignatureMethod", "HMAC-SHA1");
        params.insert("SignatureNonce", nonce);
        params.insert("SignatureVersion", "1.0");
        params.insert("TemplateCode", &self.credentials.template_code);
        params.insert("TemplateParam", &template_param);
        params.insert("Timestamp", timestamp);
        params.insert("Version", VERSION);

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let string_to_sign = format!("GET&%2F&{}", percent_encode(&query));
        let signature = self.sign(&string_to_sign);

        format!("{}&Signature={}", query, percent_encode(&signature))
    }

    /// base64(HMAC-SHA1(secret + "&", string-to-sign))
    fn sign(&self, string_to_sign: &str) -> String {
        let key = format!("{}&", self.credentials.access_key_secret);
        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
        mac.update(string_to_sign.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    /// Nanosecond timestamp; unique per call at any realistic call rate
    fn nonce(now: DateTime<Utc>) -> String {
        now.timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros())
            .to_string()
    }
}

#[async_trait]
impl SmsProvider for AliyunSmsProvider {
    async fn send(&self, phone: &str, code: &str) -> Result<(), ProviderError> {
        let now = Utc::now();
        let timestamp = now.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let query = self.signed_query(phone, code, &timestamp, &Self::nonce(now));
        let url = format!("{}?{}", ENDPOINT, query);

        let response = self
            .http
            .get(&url)
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

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::with_source("failed to parse SMS response", e))?;

        if api_response.code.as_deref() != Some("OK") {
            return Err(ProviderError::new(format!(
                "SMS send failed: {}",
                api_response
                    .message
                    .as_deref()
                    .unwrap_or("unknown provider error")
            )));
        }

        debug!(phone = %mask_phone(phone), "Aliyun SMS accepted");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Aliyun"
    }
}

fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, ALIYUN_ENCODE_SET).to_string()
}
