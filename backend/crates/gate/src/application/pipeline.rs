//! Request pipeline
//!
//! Phases run in a fixed order: preprocessors, filters, processors, then
//! modifiers on whatever response came out. Every path through the
//! pipeline yields exactly one response, including stage faults.

use crate::application::config::GateConfig;
use crate::application::stages::filters::Filter;
use crate::application::stages::modifiers::Modifier;
use crate::application::stages::preprocessors::Preprocessor;
use crate::application::stages::processors::Processor;
use crate::domain::capability::CapabilityIssuer;
use crate::domain::context::{Credentials, GateRequest, RequestContext};
use crate::domain::response::{Decision, GateResponse};
use crate::error::GateResult;
use http::StatusCode;
use kernel::error::app_error::AppError;
use platform::clock::Clock;
use pow::PowConfig;
use std::sync::Arc;

pub const FILTERED_MESSAGE: &str = "Request was filtered";
pub const NOT_HANDLED_MESSAGE: &str = "The request was not handled";

/// Shared collaborators handed to the stages
pub struct Services<I> {
    pub config: Arc<GateConfig>,
    pub pow: Arc<PowConfig>,
    pub issuer: Arc<I>,
    pub clock: Arc<dyn Clock>,
    pub credentials: Arc<Credentials>,
}

/// Ordered stage lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stages {
    pub preprocessors: Vec<Preprocessor>,
    pub filters: Vec<Filter>,
    pub processors: Vec<Processor>,
    pub modifiers: Vec<Modifier>,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            preprocessors: vec![
                Preprocessor::Cors,
                Preprocessor::StaticAssets,
                Preprocessor::ResolveTarget,
            ],
            filters: vec![Filter::TimeWindow, Filter::Referer],
            processors: vec![Processor::PowGate, Processor::Redirect],
            modifiers: vec![
                Modifier::FavoriteCharacter,
                Modifier::EasterEgg,
                Modifier::DefaultContentType,
            ],
        }
    }
}

pub struct Pipeline<I> {
    stages: Stages,
    services: Services<I>,
}

impl<I> Pipeline<I>
where
    I: CapabilityIssuer,
{
    pub fn new(services: Services<I>) -> Self {
        Self::with_stages(Stages::default(), services)
    }

    pub fn with_stages(stages: Stages, services: Services<I>) -> Self {
        Self { stages, services }
    }

    pub fn config(&self) -> &GateConfig {
        &self.services.config
    }

    /// Run one request through every phase
    pub async fn handle(&self, request: GateRequest) -> GateResponse {
        let mut ctx = RequestContext::new(request, self.services.credentials.clone());

        let mut response = match self.run(&mut ctx).await {
            Ok(response) => response,
            Err(err) => {
                err.log();
                let app: AppError = err.into();
                if app.is_server_error() {
                    tracing::error!(
                        method = %ctx.method(),
                        path = %ctx.path(),
                        error = ?app,
                        "Request failed"
                    );
                }
                GateResponse::from_app_error(&app, self.services.config.debug)
            }
        };

        for modifier in &self.stages.modifiers {
            modifier.apply(&mut response, &self.services.config);
        }
        response
    }

    async fn run(&self, ctx: &mut RequestContext) -> GateResult<GateResponse> {
        for stage in &self.stages.preprocessors {
            if let Decision::Respond(response) = stage.evaluate(ctx, &self.services.config).await? {
                tracing::debug!(stage = stage.name(), status = %response.status, "Preprocessor responded");
                return Ok(response);
            }
        }

        // Context is read-only from here on
        let ctx: &RequestContext = ctx;

        let now_ms = self.services.clock.now_ms();
        for filter in &self.stages.filters {
            if !filter.allows(ctx, now_ms)? {
                return Ok(GateResponse::error(StatusCode::FORBIDDEN, FILTERED_MESSAGE));
            }
        }

        for stage in &self.stages.processors {
            if let Decision::Respond(response) = stage.evaluate(ctx, &self.services).await? {
                tracing::debug!(stage = stage.name(), status = %response.status, "Processor responded");
                return Ok(response);
            }
        }

        Ok(GateResponse::error(StatusCode::NOT_FOUND, NOT_HANDLED_MESSAGE))
    }
}
