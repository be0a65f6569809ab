//! HTTP Handlers
//!
//! Translate between axum requests and the transport-agnostic pipeline.

use crate::application::pipeline::Pipeline;
use crate::domain::capability::CapabilityIssuer;
use crate::domain::context::GateRequest;
use crate::domain::response::GateResponse;
use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use kernel::error::app_error::ResultExt;
use kernel::error::kind::ErrorKind;
use platform::client::extract_client_ip;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

/// Catch-all handler: every method and path goes through the pipeline
pub async fn handle_request<I>(
    State(pipeline): State<Arc<Pipeline<I>>>,
    request: Request,
) -> Response
where
    I: CapabilityIssuer + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let direct_ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(&parts.headers, direct_ip);

    let body = axum::body::to_bytes(body, pipeline.config().max_body_bytes).await;
    let (kind, message) = match &body {
        Err(e) if exceeds_limit(e) => (ErrorKind::PayloadTooLarge, "Request body too large"),
        _ => (ErrorKind::BadRequest, "Failed to read request body"),
    };
    let body = match body.map_app_err(kind, message) {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::warn!(error = ?e, "Request body rejected");
            return e.into_response();
        }
    };

    let request = GateRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        headers: parts.headers,
        body,
        client_ip,
    };

    pipeline.handle(request).await.into_response()
}

/// Whether a body read stopped at the configured size limit
fn exceeds_limit(err: &axum::Error) -> bool {
    err.source().is_some_and(|inner| inner.is::<LengthLimitError>())
}

impl IntoResponse for GateResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
