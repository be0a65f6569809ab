//! Verify Solution Use Case

use crate::application::config::PowConfig;
use crate::domain::entities::{RejectReason, VerificationResult};
use crate::domain::services::{compute_pow_hash, count_leading_zero_bits, meets_difficulty};
use crate::infra::token::ChallengeSigner;
use std::sync::Arc;

/// Input DTO for verify solution
#[derive(Debug, Clone)]
pub struct VerifySolutionInput {
    /// Token exactly as issued
    pub challenge: String,
    /// Client-chosen nonce text
    pub nonce: String,
    /// Verification instant, milliseconds since the Unix epoch
    pub now_ms: i64,
}

/// Verify Solution Use Case
///
/// Checks run in order: signature, age, hash prefix. A well-formed input
/// never produces an error, only a [`VerificationResult`].
pub struct VerifySolutionUseCase {
    config: Arc<PowConfig>,
}

impl VerifySolutionUseCase {
    pub fn new(config: Arc<PowConfig>) -> Self {
        Self { config }
    }

    /// Verify an answer and return the resource path bound to the challenge
    pub fn execute(&self, input: &VerifySolutionInput) -> VerificationResult {
        let claims = match ChallengeSigner::new(&self.config.challenge_secret).verify(&input.challenge)
        {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Challenge token rejected");
                return VerificationResult::Invalid(RejectReason::InvalidSignature);
            }
        };

        if claims.is_expired_at(input.now_ms) {
            tracing::debug!(
                resource = %claims.resource_path,
                issued_at_ms = claims.issued_at_ms,
                expiry_secs = claims.expiry_secs,
                "Challenge expired"
            );
            return VerificationResult::Invalid(RejectReason::Expired);
        }

        // A correctly signed token always carries an in-range difficulty, but
        // an out-of-range one must not be treated as zero work
        let Some(difficulty) = claims.difficulty() else {
            return VerificationResult::Invalid(RejectReason::InvalidSignature);
        };

        let hash = compute_pow_hash(&input.challenge, &input.nonce);
        if !meets_difficulty(&hash, difficulty) {
            tracing::debug!(
                required_bits = difficulty.bits(),
                leading_zero_bits = count_leading_zero_bits(&hash),
                "Insufficient proof of work"
            );
            return VerificationResult::Invalid(RejectReason::InvalidSolution);
        }

        tracing::info!(
            resource = %claims.resource_path,
            difficulty_bits = difficulty.bits(),
            "PoW verification successful"
        );

        VerificationResult::Valid {
            resource_path: claims.resource_path,
        }
    }

    /// Verify an answer and additionally require it to be bound to `resource_path`
    pub fn execute_for(&self, input: &VerifySolutionInput, resource_path: &str) -> VerificationResult {
        match self.execute(input) {
            VerificationResult::Valid { resource_path: bound } if bound != resource_path => {
                tracing::warn!(
                    bound = %bound,
                    requested = %resource_path,
                    "Challenge resource mismatch"
                );
                VerificationResult::Invalid(RejectReason::ResourceMismatch)
            }
            other => other,
        }
    }
}
