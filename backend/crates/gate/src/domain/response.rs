//! Pipeline responses and stage decisions

use crate::error::GateResult;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use kernel::error::app_error::AppError;
use serde::Serialize;
use std::borrow::Cow;

pub const CONTENT_TYPE_JSON: &str = "application/json;charset=utf-8";
pub const CONTENT_TYPE_HTML: &str = "text/html;charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain;charset=utf-8";

/// Response produced by a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl GateResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// JSON body with a JSON content type
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> GateResult<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new(status)
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
            .with_body(body))
    }

    /// HTML document body
    pub fn html(status: StatusCode, document: &'static str) -> Self {
        Self::new(status)
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HTML))
            .with_body(document)
    }

    /// Structured `{"error": ...}` body
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new(status)
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
            .with_body(body)
    }

    /// Client-facing rendering of an error
    ///
    /// Server-class errors collapse to the generic fault message unless
    /// `debug` is set.
    pub fn from_app_error(err: &AppError, debug: bool) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::error(status, &err.public_message(debug))
    }

    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Outcome of a preprocessing or processing stage
#[derive(Debug)]
pub enum Decision {
    /// Pass control to the next stage
    Continue,
    /// Short-circuit with this response
    Respond(GateResponse),
}
