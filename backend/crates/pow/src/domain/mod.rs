//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (ChallengeClaims, VerificationResult)
//! - Domain value objects (Difficulty, ExpiryStrategy, ExpiryModel)
//! - Domain services (hashing, bit-prefix check, expiry model, solver)

pub mod entities;
pub mod services;
pub mod value_objects;
