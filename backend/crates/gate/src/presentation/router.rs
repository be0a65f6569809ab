//! Gate Router

use crate::application::pipeline::Pipeline;
use crate::domain::capability::CapabilityIssuer;
use crate::presentation::handlers;
use axum::Router;
use std::sync::Arc;

/// Create the gate router
///
/// The gate owns the whole path space, so everything is routed through a
/// single fallback handler.
pub fn gate_router<I>(pipeline: Pipeline<I>) -> Router
where
    I: CapabilityIssuer + Send + Sync + 'static,
{
    Router::new()
        .fallback(handlers::handle_request::<I>)
        .with_state(Arc::new(pipeline))
}
