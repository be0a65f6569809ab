//! Admission filters
//!
//! A filter returns a plain verdict. The first `false` stops the pipeline
//! with `403 Request was filtered`.

use crate::domain::context::RequestContext;
use crate::domain::predicates::{referer_allows, time_window_allows};
use crate::error::{GateError, GateResult};
use platform::client::extract_referer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// `NotBefore` / `NotAfter` window
    TimeWindow,
    /// `Referer` hostname allow-list
    Referer,
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::TimeWindow => "time_window",
            Filter::Referer => "referer",
        }
    }

    pub fn allows(&self, ctx: &RequestContext, now_ms: i64) -> GateResult<bool> {
        let target = ctx
            .target()
            .ok_or(GateError::TargetNotResolved(self.name()))?;

        let allowed = match self {
            Filter::TimeWindow => time_window_allows(&target.policy, now_ms),
            Filter::Referer => referer_allows(&target.policy, extract_referer(ctx.headers())),
        };

        if !allowed {
            tracing::info!(
                filter = self.name(),
                path = %ctx.path(),
                client_ip = ?ctx.request.client_ip,
                "Request filtered"
            );
        }
        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::stages::preprocessors::resolve_target;
    use crate::domain::context::{Credentials, GateRequest};
    use http::{HeaderValue, Method, header};
    use std::sync::Arc;

    fn resolved(path: &str, referer: Option<&'static str>) -> RequestContext {
        let mut request = GateRequest::new(Method::GET, path);
        if let Some(referer) = referer {
            request
                .headers
                .insert(header::REFERER, HeaderValue::from_static(referer));
        }
        let mut ctx = RequestContext::new(request, Arc::new(Credentials::default()));
        ctx.set_target(resolve_target(path).unwrap());
        ctx
    }

    #[test]
    fn test_time_window_filter() {
        let ctx = resolved("/NotBefore=1000;NotAfter=2000/f", None);
        assert!(Filter::TimeWindow.allows(&ctx, 1500).unwrap());
        assert!(!Filter::TimeWindow.allows(&ctx, 999).unwrap());
        assert!(!Filter::TimeWindow.allows(&ctx, 2001).unwrap());
    }

    #[test]
    fn test_referer_filter() {
        let ctx = resolved("/Referer=a.com/f", Some("https://a.com/page"));
        assert!(Filter::Referer.allows(&ctx, 0).unwrap());

        let ctx = resolved("/Referer=a.com/f", None);
        assert!(!Filter::Referer.allows(&ctx, 0).unwrap());

        let ctx = resolved("/public/f", None);
        assert!(Filter::Referer.allows(&ctx, 0).unwrap());
    }

    #[test]
    fn test_unresolved_target_is_a_fault() {
        let ctx = RequestContext::new(
            GateRequest::new(Method::GET, "/a/b"),
            Arc::new(Credentials::default()),
        );
        assert!(matches!(
            Filter::Referer.allows(&ctx, 0),
            Err(GateError::TargetNotResolved("referer"))
        ));
    }
}
