//! Access gate for object storage
//!
//! Every request path has the form `/{policy}/{resource}`. The policy segment
//! carries `;`-separated options (`Referer`, `NotBefore`, `NotAfter`, `PoW`)
//! that decide whether the caller is redirected to a short-lived storage URL,
//! asked to solve a proof-of-work challenge first, or refused.
//!
//! Clean Architecture structure:
//! - `domain/` - Policy parsing, admission predicates, request context
//! - `application/` - Configuration, stages and the pipeline that runs them
//! - `infra/` - Presigned URL issuer and static asset serving
//! - `presentation/` - axum adapter

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{GateConfig, StorageConfig};
pub use application::pipeline::{Pipeline, Services, Stages};
pub use domain::capability::CapabilityIssuer;
pub use domain::context::{Credentials, GateRequest, RequestContext};
pub use domain::policy::AccessPolicy;
pub use domain::response::{Decision, GateResponse};
pub use error::{GateError, GateResult};
pub use infra::presign::PresignedUrlIssuer;
pub use presentation::router::gate_router;
