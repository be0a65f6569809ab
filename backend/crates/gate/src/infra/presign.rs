//! V4 query-string presigning for object storage
//!
//! Produces URLs of the form
//! `{base_url}/{key}?x-oss-signature-version=...&x-oss-signature=...` that the
//! storage service accepts without further credentials until they expire.

use crate::application::config::StorageConfig;
use crate::domain::capability::CapabilityIssuer;
use crate::domain::context::Credentials;
use crate::error::{GateError, GateResult};
use chrono::{DateTime, Utc};
use http::Method;
use platform::clock::Clock;
use platform::crypto::{hmac_sha256, sha256};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const ALGORITHM_IDENTIFIER: &str = "OSS4-HMAC-SHA256";
pub const KEY_PREFIX: &str = "aliyun_v4";
pub const KEY_TYPE_IDENTIFIER: &str = "aliyun_v4_request";
pub const SERVICE: &str = "oss";
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

pub const SIGNATURE_VERSION_QUERY_PARAM: &str = "x-oss-signature-version";
pub const CREDENTIAL_QUERY_PARAM: &str = "x-oss-credential";
pub const DATE_QUERY_PARAM: &str = "x-oss-date";
pub const EXPIRES_QUERY_PARAM: &str = "x-oss-expires";
pub const SECURITY_TOKEN_QUERY_PARAM: &str = "x-oss-security-token";
pub const SIGNATURE_QUERY_PARAM: &str = "x-oss-signature";

/// Capability issuer backed by presigned storage URLs
pub struct PresignedUrlIssuer {
    storage: Arc<StorageConfig>,
    expires: Duration,
    clock: Arc<dyn Clock>,
}

impl PresignedUrlIssuer {
    pub fn new(storage: Arc<StorageConfig>, expires: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            expires,
            clock,
        }
    }

    /// Sign `object_key` for `method` at the instant `now`
    pub fn sign_at(
        &self,
        object_key: &str,
        credentials: &Credentials,
        method: &Method,
        now: DateTime<Utc>,
    ) -> GateResult<String> {
        if !credentials.is_complete() {
            return Err(GateError::Configuration("storage credentials".to_string()));
        }

        let date_time = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = &date_time[..8];
        let scope = derive_scope(date, &self.storage.region);

        let mut params: Vec<(&str, String)> = vec![
            (SIGNATURE_VERSION_QUERY_PARAM, ALGORITHM_IDENTIFIER.to_string()),
            (
                CREDENTIAL_QUERY_PARAM,
                format!("{}/{}", credentials.access_key_id, scope),
            ),
            (DATE_QUERY_PARAM, date_time.clone()),
            (EXPIRES_QUERY_PARAM, self.expires.as_secs().to_string()),
        ];
        if let Some(token) = credentials.security_token.as_deref().filter(|t| !t.is_empty()) {
            params.push((SECURITY_TOKEN_QUERY_PARAM, token.to_string()));
        }
        params.sort_by(|a, b| a.0.cmp(b.0));
        let query = canonical_query_string(&params);

        let canonical_uri = format!("/{}/{}", self.storage.bucket, object_key);
        let canonical_request = derive_canonical_request(method, &canonical_uri, &query);
        let string_to_sign = derive_string_to_sign(&canonical_request, &date_time, &scope);
        let signing_key = derive_signing_key(
            &credentials.access_key_secret,
            date,
            &self.storage.region,
        );
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        let mut url = Url::parse(&self.storage.base_url)
            .and_then(|base| base.join(object_key))
            .map_err(|e| GateError::Configuration(format!("BASE_URL: {e}")))?;
        url.set_query(Some(&format!(
            "{query}&{SIGNATURE_QUERY_PARAM}={signature}"
        )));

        Ok(url.into())
    }
}

impl CapabilityIssuer for PresignedUrlIssuer {
    async fn issue(
        &self,
        object_key: &str,
        credentials: &Credentials,
        method: &Method,
    ) -> GateResult<String> {
        let now = DateTime::<Utc>::from_timestamp_millis(self.clock.now_ms())
            .ok_or_else(|| GateError::Configuration("clock out of range".to_string()))?;
        let url = self.sign_at(object_key, credentials, method, now)?;

        tracing::debug!(
            object_key,
            method = %method,
            expires_secs = self.expires.as_secs(),
            "Issued presigned URL"
        );

        Ok(url)
    }
}

fn derive_scope(date: &str, region: &str) -> String {
    format!("{date}/{region}/{SERVICE}/{KEY_TYPE_IDENTIFIER}")
}

fn derive_signing_key(secret: &str, date: &str, region: &str) -> [u8; 32] {
    let key = format!("{KEY_PREFIX}{secret}");
    let k_date = hmac_sha256(key.as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes());
    hmac_sha256(&k_service, KEY_TYPE_IDENTIFIER.as_bytes())
}

/// `key=value` pairs, RFC 3986 encoded, in the order given
fn canonical_query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// No signed headers: both header sections are empty
fn derive_canonical_request(method: &Method, canonical_uri: &str, query: &str) -> String {
    format!("{method}\n{canonical_uri}\n{query}\n\n\n{UNSIGNED_PAYLOAD}")
}

fn derive_string_to_sign(canonical_request: &str, date_time: &str, scope: &str) -> String {
    format!(
        "{ALGORITHM_IDENTIFIER}\n{date_time}\n{scope}\n{}",
        hex::encode(sha256(canonical_request.as_bytes()))
    )
}
