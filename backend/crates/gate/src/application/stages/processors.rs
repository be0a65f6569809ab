//! Processing stages
//!
//! The first processor that responds ends the pipeline.

use crate::application::pipeline::Services;
use crate::domain::capability::CapabilityIssuer;
use crate::domain::context::{RequestContext, ResourceTarget};
use crate::domain::policy::POW;
use crate::domain::response::{Decision, GateResponse};
use crate::error::{GateError, GateResult};
use http::{HeaderValue, Method, StatusCode, header};
use platform::client::is_document_navigation;
use pow::models::{ChallengeResponse, SolutionResponse, SubmitRequest};
use pow::presentation::solver_page::{
    CHALLENGE_CACHE_CONTROL, SOLVER_PAGE, SOLVER_PAGE_CACHE_CONTROL, SOLVER_PAGE_CSP,
};
use pow::{
    Difficulty, IssueChallengeInput, IssueChallengeUseCase, PowError, RejectReason,
    VerificationResult, VerifySolutionInput, VerifySolutionUseCase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processor {
    /// Challenge issuance and answer verification for `PoW` paths
    PowGate,
    /// Redirect to a capability URL
    Redirect,
}

impl Processor {
    pub fn name(&self) -> &'static str {
        match self {
            Processor::PowGate => "pow_gate",
            Processor::Redirect => "redirect",
        }
    }

    pub async fn evaluate<I>(&self, ctx: &RequestContext, services: &Services<I>) -> GateResult<Decision>
    where
        I: CapabilityIssuer,
    {
        let target = ctx
            .target()
            .ok_or(GateError::TargetNotResolved(self.name()))?;

        match self {
            Processor::PowGate => pow_gate(ctx, target, services).await,
            Processor::Redirect => redirect(ctx, target, services).await,
        }
    }
}

async fn pow_gate<I>(
    ctx: &RequestContext,
    target: &ResourceTarget,
    services: &Services<I>,
) -> GateResult<Decision>
where
    I: CapabilityIssuer,
{
    let Some(difficulty) = target.policy.non_empty(POW).and_then(Difficulty::from_policy) else {
        return Ok(Decision::Continue);
    };

    match *ctx.method() {
        Method::GET if is_document_navigation(ctx.headers()) => {
            let response = GateResponse::html(StatusCode::UNAUTHORIZED, SOLVER_PAGE)
                .with_header(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(SOLVER_PAGE_CSP),
                )
                .with_header(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(SOLVER_PAGE_CACHE_CONTROL),
                );
            Ok(Decision::Respond(response))
        }
        Method::GET => {
            let issued = IssueChallengeUseCase::new(services.pow.clone()).execute(
                IssueChallengeInput {
                    resource_path: ctx.path().to_string(),
                    difficulty,
                    now_ms: services.clock.now_ms(),
                },
            )?;

            let response =
                GateResponse::json(StatusCode::UNAUTHORIZED, &ChallengeResponse::from(&issued))?
                    .with_header(
                        header::CACHE_CONTROL,
                        HeaderValue::from_static(CHALLENGE_CACHE_CONTROL),
                    );
            Ok(Decision::Respond(response))
        }
        Method::POST => {
            let submission = SubmitRequest::parse(&ctx.request.body)?;
            let input = VerifySolutionInput {
                challenge: submission.challenge,
                nonce: submission.nonce,
                now_ms: services.clock.now_ms(),
            };

            match VerifySolutionUseCase::new(services.pow.clone()).execute_for(&input, ctx.path()) {
                VerificationResult::Valid { .. } => {}
                VerificationResult::Invalid(RejectReason::ResourceMismatch) => {
                    return Err(PowError::ResourceMismatch.into());
                }
                VerificationResult::Invalid(reason) => {
                    return Err(PowError::Rejected(reason).into());
                }
            }

            let url = services
                .issuer
                .issue(&target.object_key(), ctx.credentials(), &Method::GET)
                .await?;

            let body = SolutionResponse {
                url,
                expires: services.config.signed_url_expires.as_secs(),
            };
            let response = GateResponse::json(StatusCode::OK, &body)?.with_header(
                header::CACHE_CONTROL,
                HeaderValue::from_static(CHALLENGE_CACHE_CONTROL),
            );
            Ok(Decision::Respond(response))
        }
        _ => Err(PowError::MethodNotAllowed.into()),
    }
}

async fn redirect<I>(
    ctx: &RequestContext,
    target: &ResourceTarget,
    services: &Services<I>,
) -> GateResult<Decision>
where
    I: CapabilityIssuer,
{
    if !services.config.is_allowed_method(ctx.method()) {
        return Err(GateError::MethodNotAllowed);
    }

    let url = services
        .issuer
        .issue(&target.object_key(), ctx.credentials(), ctx.method())
        .await?;
    let location = HeaderValue::from_str(&url)
        .map_err(|e| GateError::Configuration(format!("capability URL: {e}")))?;

    tracing::debug!(object_key = %target.object_key(), "Redirecting to capability URL");

    let response = GateResponse::new(StatusCode::TEMPORARY_REDIRECT)
        .with_header(header::LOCATION, location)
        .with_header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(Decision::Respond(response))
}
