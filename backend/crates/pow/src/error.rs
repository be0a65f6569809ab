//! PoW Error Types
//!
//! This module provides PoW-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use crate::domain::entities::RejectReason;
use http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// PoW-specific result type alias
pub type PowResult<T> = Result<T, PowError>;

/// PoW-specific error variants
///
/// The display strings are what the client sees for 4xx variants, so they
/// never include token contents or secret material.
#[derive(Debug, Error)]
pub enum PowError {
    /// Submission body is not JSON
    #[error("Invalid JSON body")]
    InvalidJsonBody(#[source] serde_json::Error),

    /// Submission lacks the challenge or the nonce
    #[error("Missing challenge or nonce")]
    MissingField,

    /// Numeric nonce that is not an exact integer
    #[error("Nonce must be a string or an integer")]
    InvalidNonce,

    /// Answer failed verification
    #[error("PoW verification failed: {0}")]
    Rejected(RejectReason),

    /// Valid answer for a different resource
    #[error("PoW challenge resource mismatch")]
    ResourceMismatch,

    /// Only GET (issue) and POST (answer) are meaningful on a gated path
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Shared secret missing or too short
    #[error("PoW configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PowError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PowError::InvalidJsonBody(_) | PowError::MissingField | PowError::InvalidNonce => {
                StatusCode::BAD_REQUEST
            }
            PowError::Rejected(_) | PowError::ResourceMismatch => StatusCode::FORBIDDEN,
            PowError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            PowError::Configuration(_) | PowError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PowError::InvalidJsonBody(_) | PowError::MissingField | PowError::InvalidNonce => {
                ErrorKind::BadRequest
            }
            PowError::Rejected(_) | PowError::ResourceMismatch => ErrorKind::Forbidden,
            PowError::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            PowError::Configuration(_) | PowError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            PowError::Configuration(msg) => {
                tracing::error!(message = %msg, "PoW configuration error");
            }
            PowError::Internal(msg) => {
                tracing::error!(message = %msg, "PoW internal error");
            }
            PowError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "PoW answer rejected");
            }
            PowError::ResourceMismatch => {
                tracing::warn!("PoW answer presented for another resource");
            }
            _ => {
                tracing::debug!(error = %self, "PoW error");
            }
        }
    }
}

impl From<PowError> for AppError {
    fn from(err: PowError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message).with_source(err)
    }
}
