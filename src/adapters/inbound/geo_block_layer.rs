//! GeoBlock tower middleware
//!
//! Wraps any inner HTTP service. Requests whose forwarded client IPs pass
//! the country policy reach the inner service untouched; all others are
//! answered with `403 Forbidden` and an empty body.

use crate::application::GeoBlockService;
use crate::domain::entities::{DenyReason, Verdict};
use crate::domain::value_objects::CandidateIps;
use axum::http::{header, HeaderMap, Request, Response, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Collect candidate client IPs from `X-Forwarded-For` and `X-Real-IP`.
///
/// Both headers are split on commas and every repeated header line is
/// read. Bytes that are not UTF-8 are kept lossily so they fail lookup.
pub fn candidate_ips_from_headers(headers: &HeaderMap) -> CandidateIps {
    let mut ips = CandidateIps::new();
    for name in [X_FORWARDED_FOR, X_REAL_IP] {
        for value in headers.get_all(name) {
            ips.add_header_value(&String::from_utf8_lossy(value.as_bytes()));
        }
    }
    ips
}

#[derive(Clone)]
pub struct GeoBlockLayer {
    service: Arc<GeoBlockService>,
}

impl GeoBlockLayer {
    pub fn new(service: Arc<GeoBlockService>) -> Self {
        Self { service }
    }
}

impl<S> Layer<S> for GeoBlockLayer {
    type Service = GeoBlockMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GeoBlockMiddleware {
            inner,
            service: self.service.clone(),
        }
    }
}

#[derive(Clone)]
pub struct GeoBlockMiddleware<S> {
    inner: S,
    service: Arc<GeoBlockService>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for GeoBlockMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: 'static,
    ReqBody: 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Take the service that poll_ready readied; a rejected request drops
        // it, releasing whatever capacity it reserved.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        // Disabled filters skip header parsing entirely
        if !self.service.is_enabled() {
            return Box::pin(inner.call(req));
        }

        let candidates = candidate_ips_from_headers(req.headers());
        match self.service.check(&candidates) {
            Verdict::Allow(_) => Box::pin(inner.call(req)),
            Verdict::Deny(reason) => {
                log_denial(self.service.name(), req.headers(), &reason);
                drop(inner);
                Box::pin(async {
                    let mut response = Response::new(ResBody::default());
                    *response.status_mut() = StatusCode::FORBIDDEN;
                    Ok(response)
                })
            }
        }
    }
}

fn log_denial(filter: &str, headers: &HeaderMap, reason: &DenyReason) {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    match reason {
        DenyReason::Policy { ip, decision } => tracing::warn!(
            filter,
            host,
            ip = %ip,
            country = %decision.country,
            reason = %decision.reason,
            "access denied"
        ),
        DenyReason::Lookup { ip, error } => tracing::warn!(
            filter,
            host,
            ip = %ip,
            error = %error,
            "access denied: lookup failed"
        ),
    }
}
