//! Preprocessing stages
//!
//! The only stages allowed to mutate the request context.

use crate::application::config::GateConfig;
use crate::domain::context::{RequestContext, ResourceTarget};
use crate::domain::policy::AccessPolicy;
use crate::domain::response::{Decision, GateResponse};
use crate::error::{GateError, GateResult};
use crate::infra::static_files;
use http::{HeaderValue, Method, StatusCode, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessor {
    /// Answer CORS preflight requests
    Cors,
    /// Serve the solver UI asset tree
    StaticAssets,
    /// Resolve `/{arg1}/{arg2}` into a policy and resource
    ResolveTarget,
}

impl Preprocessor {
    pub fn name(&self) -> &'static str {
        match self {
            Preprocessor::Cors => "cors",
            Preprocessor::StaticAssets => "static_assets",
            Preprocessor::ResolveTarget => "resolve_target",
        }
    }

    pub async fn evaluate(
        &self,
        ctx: &mut RequestContext,
        config: &GateConfig,
    ) -> GateResult<Decision> {
        match self {
            Preprocessor::Cors => Ok(preflight(ctx, config)),
            Preprocessor::StaticAssets => {
                if !static_files::is_static_path(ctx.path()) {
                    return Ok(Decision::Continue);
                }
                let response = static_files::serve(config.web_root.as_deref(), ctx.path()).await?;
                Ok(Decision::Respond(response))
            }
            Preprocessor::ResolveTarget => {
                let target = resolve_target(ctx.path())?;
                tracing::debug!(
                    arg1 = %target.arg1,
                    arg2 = %target.arg2,
                    options = target.policy.len(),
                    "Resolved request target"
                );
                ctx.set_target(target);
                Ok(Decision::Continue)
            }
        }
    }
}

fn preflight(ctx: &RequestContext, config: &GateConfig) -> Decision {
    if *ctx.method() != Method::OPTIONS {
        return Decision::Continue;
    }

    let mut response = GateResponse::new(StatusCode::OK);
    for (name, value) in [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, &config.cors_allow_origin),
        (header::ACCESS_CONTROL_ALLOW_METHODS, &config.cors_allow_methods),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, &config.cors_allow_headers),
    ] {
        if let Ok(value) = HeaderValue::from_str(value) {
            response.headers.insert(name, value);
        }
    }
    Decision::Respond(response)
}

/// Split a path into exactly two decoded, non-empty segments
pub fn resolve_target(path: &str) -> GateResult<ResourceTarget> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [arg1, arg2] = segments.as_slice() else {
        return Err(GateError::InvalidPath);
    };

    let decode = |raw: &str| {
        urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .map_err(|_| GateError::InvalidPath)
    };
    let arg1 = decode(*arg1)?;
    let arg2 = decode(*arg2)?;

    Ok(ResourceTarget {
        policy: AccessPolicy::parse(&arg1),
        arg1,
        arg2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::{Credentials, GateRequest};
    use crate::domain::policy::{POW, REFERER};
    use std::sync::Arc;

    fn ctx(method: Method, path: &str) -> RequestContext {
        RequestContext::new(GateRequest::new(method, path), Arc::new(Credentials::default()))
    }

    #[test]
    fn test_resolve_target() {
        let target = resolve_target("/Referer=a.com;PoW=4/file.txt").unwrap();
        assert_eq!(target.arg1, "Referer=a.com;PoW=4");
        assert_eq!(target.arg2, "file.txt");
        assert_eq!(target.policy.get(REFERER), Some("a.com"));
        assert_eq!(target.policy.get(POW), Some("4"));
    }

    #[test]
    fn test_resolve_target_decodes_segments() {
        let target = resolve_target("/Referer%3Da.com%2C/my%20file.txt").unwrap();
        assert_eq!(target.policy.get(REFERER), Some("a.com,"));
        assert_eq!(target.arg2, "my file.txt");
    }

    #[test]
    fn test_resolve_target_ignores_empty_segments() {
        let target = resolve_target("//public//file.txt/").unwrap();
        assert_eq!(target.arg1, "public");
        assert_eq!(target.arg2, "file.txt");
    }

    #[test]
    fn test_resolve_target_requires_two_segments() {
        for path in ["/", "/only", "/a/b/c", "/a/%FF"] {
            assert!(
                matches!(resolve_target(path), Err(GateError::InvalidPath)),
                "path: {path}"
            );
        }
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let config = GateConfig::default();
        let mut options = ctx(Method::OPTIONS, "/anything");
        let Decision::Respond(response) = Preprocessor::Cors
            .evaluate(&mut options, &config)
            .await
            .unwrap()
        else {
            panic!("preflight must respond");
        };
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_METHODS),
            Some("GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS")
        );
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_HEADERS), Some("Content-Type"));
        assert!(response.body.is_empty());

        let mut get = ctx(Method::GET, "/anything");
        assert!(matches!(
            Preprocessor::Cors.evaluate(&mut get, &config).await.unwrap(),
            Decision::Continue
        ));
    }

    #[tokio::test]
    async fn test_resolve_target_stage_stores_target() {
        let config = GateConfig::default();
        let mut ctx = ctx(Method::GET, "/public/file.txt");
        assert!(ctx.target().is_none());

        let decision = Preprocessor::ResolveTarget.evaluate(&mut ctx, &config).await.unwrap();
        assert!(matches!(decision, Decision::Continue));
        assert_eq!(ctx.target().map(|t| t.arg2.as_str()), Some("file.txt"));
    }
}
