//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and token signing.
//! Contains use case implementations.

pub mod config;
pub mod issue_challenge;
pub mod verify_solution;
