//! Application Configuration
//!
//! Deployment settings for the gate pipeline and the storage issuer.

use crate::domain::context::Credentials;
use crate::error::{GateError, GateResult};
use http::Method;
use std::path::PathBuf;
use std::time::Duration;

/// Value of `X-Project-Developer-Favorite-Character` when the easter egg is on
pub const EASTER_EGG_CHARACTER: &str = "Kiana Kaslana (Herrscher of Finality)";

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Append the error chain to server-fault responses
    pub debug: bool,
    /// Methods that may be redirected to storage
    pub allowed_methods: Vec<Method>,
    /// Lifetime of issued capability URLs
    pub signed_url_expires: Duration,
    /// Directory served under `/web/`; static paths answer 404 without it
    pub web_root: Option<PathBuf>,
    /// Value for `X-Service-Owner-Favorite-Character`
    pub favorite_character: Option<String>,
    /// Add `X-Project-Developer-Favorite-Character`
    pub easter_egg: bool,
    /// Largest request body read into memory
    pub max_body_bytes: usize,
    pub cors_allow_origin: String,
    pub cors_allow_methods: String,
    pub cors_allow_headers: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            debug: false,
            allowed_methods: vec![Method::GET, Method::HEAD],
            signed_url_expires: Duration::from_secs(10),
            web_root: None,
            favorite_character: None,
            easter_egg: false,
            max_body_bytes: 64 * 1024,
            cors_allow_origin: "*".to_string(),
            cors_allow_methods: "GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS".to_string(),
            cors_allow_headers: "Content-Type".to_string(),
        }
    }
}

impl GateConfig {
    pub fn is_allowed_method(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }
}

/// Object storage the capability URLs point into
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Public endpoint the object key is joined onto
    pub base_url: String,
    pub bucket: String,
    pub region: String,
    pub credentials: Credentials,
}

impl StorageConfig {
    /// Refuse to start without every storage setting
    pub fn validate(&self) -> GateResult<()> {
        let missing = [
            ("BASE_URL", self.base_url.is_empty()),
            ("BUCKET", self.bucket.is_empty()),
            ("REGION", self.region.is_empty()),
            ("ACCESS_KEY_ID", self.credentials.access_key_id.is_empty()),
            ("ACCESS_KEY_SECRET", self.credentials.access_key_secret.is_empty()),
        ];
        if let Some((name, _)) = missing.iter().find(|(_, is_missing)| *is_missing) {
            return Err(GateError::Configuration((*name).to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| GateError::Configuration(format!("BASE_URL: {e}")))?;
        Ok(())
    }
}
