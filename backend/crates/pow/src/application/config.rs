//! Application Configuration
//!
//! Configuration for the PoW application layer.

use std::time::Duration;

use crate::domain::value_objects::{ExpiryModel, ExpiryStrategy};
use crate::error::{PowError, PowResult};

/// PoW application configuration
#[derive(Debug, Clone)]
pub struct PowConfig {
    /// Shared secret for challenge signing (at least 32 bytes)
    pub challenge_secret: Vec<u8>,
    /// Random seed length per challenge, in bytes
    pub nonce_seed_len: usize,
    /// How difficulty maps to challenge lifetime
    pub expiry_strategy: ExpiryStrategy,
    /// Slowest supported client, hashes per second
    pub hashrate_min: u64,
    /// Typical client, hashes per second
    pub hashrate_avg: u64,
    /// Shortest challenge lifetime
    pub min_expiry: Duration,
    /// Longest challenge lifetime
    pub max_expiry: Duration,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            challenge_secret: vec![0u8; 32],
            nonce_seed_len: 16,
            expiry_strategy: ExpiryStrategy::Conservative,
            hashrate_min: 200_000,
            hashrate_avg: 300_000,
            min_expiry: Duration::from_secs(15),
            max_expiry: Duration::from_secs(1800),
        }
    }
}

impl PowConfig {
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create config with a random challenge secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            challenge_secret: platform::crypto::random_bytes(Self::MIN_SECRET_LEN),
            ..Default::default()
        }
    }

    /// Create config with an explicit challenge secret
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            challenge_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Refuse to run with a missing, short, or all-zero secret
    pub fn validate(&self) -> PowResult<()> {
        if self.challenge_secret.len() < Self::MIN_SECRET_LEN {
            return Err(PowError::Configuration(format!(
                "challenge secret must be at least {} bytes",
                Self::MIN_SECRET_LEN
            )));
        }
        if self.challenge_secret.iter().all(|&b| b == 0) {
            return Err(PowError::Configuration(
                "challenge secret must not be all zeros".to_string(),
            ));
        }
        if self.min_expiry > self.max_expiry {
            return Err(PowError::Configuration(
                "min_expiry must not exceed max_expiry".to_string(),
            ));
        }
        Ok(())
    }

    pub fn expiry_model(&self) -> ExpiryModel {
        ExpiryModel {
            strategy: self.expiry_strategy,
            hashrate_min: self.hashrate_min as f64,
            hashrate_avg: self.hashrate_avg as f64,
            min_expiry_secs: duration_secs_u32(self.min_expiry),
            max_expiry_secs: duration_secs_u32(self.max_expiry),
        }
    }
}

fn duration_secs_u32(d: Duration) -> u32 {
    u32::try_from(d.as_secs()).unwrap_or(u32::MAX)
}
