//! Domain Entities
//!
//! Core business entities for the PoW domain.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::Difficulty;

/// Challenge claims - everything needed to verify an answer later
///
/// The claims travel inside the signed token, so no server-side store is
/// consulted at verification time. Field names are kept short because the
/// token is hashed by the client on every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeClaims {
    /// Issue time, milliseconds since the Unix epoch
    #[serde(rename = "t")]
    pub issued_at_ms: i64,
    /// Request path the challenge is bound to
    #[serde(rename = "r")]
    pub resource_path: String,
    /// Random per-challenge seed (hex)
    #[serde(rename = "n")]
    pub nonce_seed: String,
    /// Required leading zero bits
    #[serde(rename = "d")]
    pub difficulty_bits: u16,
    /// Lifetime in seconds
    #[serde(rename = "e")]
    pub expiry_secs: u32,
}

impl ChallengeClaims {
    pub fn new(
        issued_at_ms: i64,
        resource_path: impl Into<String>,
        nonce_seed: impl Into<String>,
        difficulty: Difficulty,
        expiry_secs: u32,
    ) -> Self {
        Self {
            issued_at_ms,
            resource_path: resource_path.into(),
            nonce_seed: nonce_seed.into(),
            difficulty_bits: difficulty.bits(),
            expiry_secs,
        }
    }

    /// Difficulty carried by the token, if it is in range
    pub fn difficulty(&self) -> Option<Difficulty> {
        Difficulty::from_bits(self.difficulty_bits)
    }

    /// Stale once strictly more than `expiry_secs` have elapsed
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.issued_at_ms) > i64::from(self.expiry_secs) * 1000
    }
}

/// A freshly issued, signed challenge
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub token: String,
    pub difficulty: Difficulty,
    pub expiry_secs: u32,
    pub claims: ChallengeClaims,
}

/// Why an answer was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Token is older than its own lifetime
    Expired,
    /// Token is corrupt, tampered with, or signed with another secret
    InvalidSignature,
    /// Hash of token and nonce misses the required zero-bit prefix
    InvalidSolution,
    /// Token was issued for a different resource
    ResourceMismatch,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Expired => "Challenge expired",
            RejectReason::InvalidSignature => "Invalid signature",
            RejectReason::InvalidSolution => "Invalid solution",
            RejectReason::ResourceMismatch => "Resource mismatch",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of answer checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// Answer accepted; carries the resource path bound to the challenge
    Valid { resource_path: String },
    Invalid(RejectReason),
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid { .. })
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            VerificationResult::Valid { .. } => None,
            VerificationResult::Invalid(reason) => Some(*reason),
        }
    }
}
