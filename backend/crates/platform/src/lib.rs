//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64)
//! - Clock abstraction for time-dependent checks
//! - Request header helpers (referrer, fetch metadata, client IP)

pub mod client;
pub mod clock;
pub mod crypto;
