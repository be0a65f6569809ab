//! PoW (Proof of Work) Challenge Engine
//!
//! Clean Architecture structure:
//! - `domain/` - Difficulty, expiry model, claims, bit-prefix verification
//! - `application/` - Use cases (issue, verify) and configuration
//! - `infra/` - Signed token codec
//! - `presentation/` - DTOs and the solver page
//!
//! ## Security Model
//! - Challenges are stateless: the signed token carries issue time, bound
//!   resource, seed, difficulty and lifetime. Any instance holding the shared
//!   secret can verify; rotating the secret invalidates every token in flight.
//! - Signature is checked before anything else, so tampering is always
//!   reported as an authenticity failure, never as a hash failure.
//! - Expiry is a value comparison against the token's own issue time.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::PowConfig;
pub use application::issue_challenge::{IssueChallengeInput, IssueChallengeUseCase};
pub use application::verify_solution::{VerifySolutionInput, VerifySolutionUseCase};
pub use domain::entities::{ChallengeClaims, IssuedChallenge, RejectReason, VerificationResult};
pub use domain::value_objects::{Difficulty, ExpiryStrategy};
pub use error::{PowError, PowResult};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
