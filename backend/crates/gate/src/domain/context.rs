//! Request context shared by the pipeline stages

use crate::domain::policy::AccessPolicy;
use http::{HeaderMap, Method};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Inbound request as seen by the pipeline
#[derive(Debug, Clone)]
pub struct GateRequest {
    pub method: Method,
    /// Path without the query string
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Client address, used for logging only
    pub client_ip: Option<IpAddr>,
}

impl GateRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Vec::new(),
            client_ip: None,
        }
    }
}

/// Storage credentials used to sign capability URLs
#[derive(Clone, Default)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Temporary-credential session token
    pub security_token: Option<String>,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.access_key_id.is_empty() && !self.access_key_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"[REDACTED]")
            .field("security_token", &self.security_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Request target resolved from `/{arg1}/{arg2}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTarget {
    pub policy: AccessPolicy,
    /// Decoded policy segment
    pub arg1: String,
    /// Decoded resource identifier
    pub arg2: String,
}

impl ResourceTarget {
    /// Object key under which the resource is stored
    pub fn object_key(&self) -> String {
        format!(
            "{}/{}",
            urlencoding::encode(&self.arg1),
            urlencoding::encode(&self.arg2)
        )
    }
}

/// Per-request state
///
/// Preprocessors receive `&mut RequestContext`; filters and processors only
/// ever see a shared reference.
#[derive(Debug)]
pub struct RequestContext {
    pub request: GateRequest,
    target: Option<ResourceTarget>,
    credentials: Arc<Credentials>,
}

impl RequestContext {
    pub fn new(request: GateRequest, credentials: Arc<Credentials>) -> Self {
        Self {
            request,
            target: None,
            credentials,
        }
    }

    pub fn method(&self) -> &Method {
        &self.request.method
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.request.headers
    }

    pub fn target(&self) -> Option<&ResourceTarget> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: ResourceTarget) {
        self.target = Some(target);
    }

    /// Handle used to sign the final capability URL
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
