//! Gate Error Types
//!
//! Stage failures that integrate with the unified `kernel::error::AppError`
//! system. Client-class variants carry the message the client sees.

use http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use pow::PowError;
use thiserror::Error;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Gate-specific error variants
#[derive(Debug, Error)]
pub enum GateError {
    /// Path is not `/{arg1}/{arg2}`
    #[error("Invalid path format. Expected /{{arg1}}/{{arg2}}")]
    InvalidPath,

    /// Method outside the allowed set for a plain redirect
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Static path escapes the asset root
    #[error("Dangerous request")]
    DangerousPath,

    /// Challenge issuance or answer verification failed
    #[error(transparent)]
    Pow(#[from] PowError),

    /// Required deployment setting is missing or unusable
    #[error("Server configuration missing: {0}")]
    Configuration(String),

    /// A stage ran before the request target was resolved
    #[error("Request target not resolved before {0}")]
    TargetNotResolved(&'static str),

    /// Static asset could not be read
    #[error("Error serving static file")]
    StaticAsset(#[source] std::io::Error),

    /// Response body could not be serialized
    #[error("Response serialization failed")]
    Serialization(#[from] serde_json::Error),
}

impl GateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Pow(e) => e.status_code(),
            other => StatusCode::from_u16(other.kind().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::InvalidPath => ErrorKind::BadRequest,
            GateError::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            GateError::DangerousPath => ErrorKind::Forbidden,
            GateError::Pow(e) => e.kind(),
            GateError::Configuration(_)
            | GateError::TargetNotResolved(_)
            | GateError::StaticAsset(_)
            | GateError::Serialization(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            GateError::Pow(e) => e.log(),
            GateError::Configuration(msg) => {
                tracing::error!(message = %msg, "Gate configuration error");
            }
            GateError::TargetNotResolved(stage) => {
                tracing::error!(stage, "Stage ran without a resolved target");
            }
            GateError::StaticAsset(e) => {
                tracing::error!(error = %e, "Static asset read failed");
            }
            GateError::Serialization(e) => {
                tracing::error!(error = %e, "Response serialization failed");
            }
            GateError::DangerousPath => {
                tracing::warn!("Static path traversal attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Gate client error");
            }
        }
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        match err {
            // Keep the PoW error as the direct source so the chain stays short
            GateError::Pow(e) => e.into(),
            other => {
                let kind = other.kind();
                let message = other.to_string();
                AppError::new(kind, message).with_source(other)
            }
        }
    }
}
