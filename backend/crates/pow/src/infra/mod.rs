//! Infrastructure Layer
//!
//! Stateless token signing. Challenges are never persisted.

pub mod token;
