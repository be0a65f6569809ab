//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entities::IssuedChallenge;
use crate::error::{PowError, PowResult};

/// Body of the 401 response for GET on a gated path
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    pub challenge: String,
    /// Required leading zero bits
    pub difficulty: u16,
    /// Challenge lifetime in seconds
    pub expires: u32,
}

impl From<&IssuedChallenge> for ChallengeResponse {
    fn from(issued: &IssuedChallenge) -> Self {
        Self {
            challenge: issued.token.clone(),
            difficulty: issued.difficulty.bits(),
            expires: issued.expiry_secs,
        }
    }
}

/// Nonce as submitted: browsers post a number, scripts often a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NonceValue {
    Text(String),
    Number(serde_json::Number),
}

/// Largest integer a browser number holds exactly (`2^53`)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl NonceValue {
    /// Text that is appended to the token before hashing
    ///
    /// Numbers are rendered the way the browser solver renders them, so an
    /// integral float like `1.0` hashes as `1`. Fractional or out-of-range
    /// numbers have no such rendering and yield `None`.
    pub fn as_hash_input(&self) -> Option<String> {
        match self {
            NonceValue::Text(s) => Some(s.clone()),
            NonceValue::Number(n) => {
                if let Some(v) = n.as_u64() {
                    return Some(v.to_string());
                }
                if let Some(v) = n.as_i64() {
                    return Some(v.to_string());
                }
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER)
                    .map(|f| (f as i64).to_string())
            }
        }
    }
}

/// Request for POST on a gated path
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub nonce: Option<NonceValue>,
}

/// A submission with both fields present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub challenge: String,
    pub nonce: String,
}

impl SubmitRequest {
    /// Parse a raw body, failing fast on malformed JSON or missing fields
    pub fn parse(body: &[u8]) -> PowResult<Submission> {
        let request: SubmitRequest =
            serde_json::from_slice(body).map_err(PowError::InvalidJsonBody)?;
        request.into_submission()
    }

    pub fn into_submission(self) -> PowResult<Submission> {
        let challenge = self.challenge.filter(|c| !c.is_empty());
        let nonce = match self.nonce {
            Some(value) => Some(value.as_hash_input().ok_or(PowError::InvalidNonce)?),
            None => None,
        }
        .filter(|n| !n.is_empty());

        match (challenge, nonce) {
            (Some(challenge), Some(nonce)) => Ok(Submission { challenge, nonce }),
            _ => Err(PowError::MissingField),
        }
    }
}

/// Body of the 200 response for an accepted answer
#[derive(Debug, Clone, Serialize)]
pub struct SolutionResponse {
    /// Capability URL
    pub url: String,
    /// Capability URL lifetime in seconds
    pub expires: u64,
}
