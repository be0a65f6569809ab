//! Capability URL issuer trait
//!
//! Interface for minting short-lived, pre-authorized storage URLs.
//! Implementation is in infrastructure layer.

use crate::domain::context::Credentials;
use crate::error::GateResult;
use http::Method;

/// Capability issuer trait
#[trait_variant::make(CapabilityIssuer: Send)]
pub trait LocalCapabilityIssuer {
    /// Mint a URL granting `method` on `object_key` for a short lifetime
    async fn issue(
        &self,
        object_key: &str,
        credentials: &Credentials,
        method: &Method,
    ) -> GateResult<String>;
}
