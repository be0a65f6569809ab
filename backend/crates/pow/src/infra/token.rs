//! Signed challenge token codec
//!
//! Token layout: `base64url(json(claims)) "." base64url(hmac_sha256(secret, payload))`.
//! The MAC covers the encoded payload text exactly as transmitted, so any
//! re-encoding or byte flip invalidates it.

use crate::domain::entities::ChallengeClaims;
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use thiserror::Error;

/// Why a token could not be opened
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is not in payload.signature form")]
    Malformed,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token payload is not valid: {0}")]
    Payload(String),
}

/// HMAC-SHA256 signer for challenge claims
pub struct ChallengeSigner<'a> {
    secret: &'a [u8],
}

impl<'a> ChallengeSigner<'a> {
    pub fn new(secret: &'a [u8]) -> Self {
        Self { secret }
    }

    pub fn sign(&self, claims: &ChallengeClaims) -> Result<String, TokenError> {
        let json = serde_json::to_vec(claims).map_err(|e| TokenError::Payload(e.to_string()))?;
        let payload = to_base64url(&json);
        let signature = hmac_sha256(self.secret, payload.as_bytes());
        Ok(format!("{}.{}", payload, to_base64url(&signature)))
    }

    /// Check the signature, then decode the claims
    pub fn verify(&self, token: &str) -> Result<ChallengeClaims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        if payload.is_empty() || signature.contains('.') {
            return Err(TokenError::Malformed);
        }

        let signature = from_base64url(signature).map_err(|_| TokenError::Malformed)?;
        if !verify_hmac_sha256(self.secret, payload.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        let json = from_base64url(payload).map_err(|_| TokenError::Malformed)?;
        serde_json::from_slice(&json).map_err(|e| TokenError::Payload(e.to_string()))
    }
}
