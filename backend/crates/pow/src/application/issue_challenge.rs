//! Issue Challenge Use Case

use crate::application::config::PowConfig;
use crate::domain::entities::{ChallengeClaims, IssuedChallenge};
use crate::domain::services::compute_expiry_secs;
use crate::domain::value_objects::Difficulty;
use crate::error::{PowError, PowResult};
use crate::infra::token::ChallengeSigner;
use platform::crypto::random_hex;
use std::sync::Arc;

/// Input DTO for issue challenge
#[derive(Debug, Clone)]
pub struct IssueChallengeInput {
    /// Request path the challenge is bound to
    pub resource_path: String,
    pub difficulty: Difficulty,
    /// Issue instant, milliseconds since the Unix epoch
    pub now_ms: i64,
}

/// Issue Challenge Use Case
pub struct IssueChallengeUseCase {
    config: Arc<PowConfig>,
}

impl IssueChallengeUseCase {
    pub fn new(config: Arc<PowConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self, input: IssueChallengeInput) -> PowResult<IssuedChallenge> {
        let expiry_secs = compute_expiry_secs(input.difficulty, &self.config.expiry_model());

        let claims = ChallengeClaims::new(
            input.now_ms,
            input.resource_path,
            random_hex(self.config.nonce_seed_len),
            input.difficulty,
            expiry_secs,
        );

        let token = ChallengeSigner::new(&self.config.challenge_secret)
            .sign(&claims)
            .map_err(|e| PowError::Internal(e.to_string()))?;

        tracing::info!(
            resource = %claims.resource_path,
            difficulty_bits = input.difficulty.bits(),
            expiry_secs,
            "Issued challenge"
        );

        Ok(IssuedChallenge {
            token,
            difficulty: input.difficulty,
            expiry_secs,
            claims,
        })
    }
}
