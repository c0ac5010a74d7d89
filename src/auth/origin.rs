//! Same-origin gate for state-changing requests.
//!
//! Browsers attach `Origin` (or at least `Referer`) to cross-site form posts and
//! fetches, so a mismatch with `Host` marks a forged request. Requests carrying
//! neither header come from non-browser clients and pass through.

use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, header},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};
use url::Url;

use crate::error::AppError;

pub fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    )
}

pub fn check_origin(method: &Method, headers: &HeaderMap) -> Result<(), AppError> {
    if !is_state_changing(method) {
        return Ok(());
    }

    let host = header_str(headers, header::HOST);

    if let Some(origin) = header_str(headers, header::ORIGIN) {
        let origin_host = authority_of(origin).ok_or_else(|| {
            AppError::forbidden("CSRF validation failed: Invalid origin format")
        })?;
        if !same_host(&origin_host, host) {
            return Err(AppError::forbidden(
                "CSRF validation failed: Origin does not match host",
            ));
        }
        return Ok(());
    }

    if let Some(referer) = header_str(headers, header::REFERER) {
        let referer_host = authority_of(referer).ok_or_else(|| {
            AppError::forbidden("CSRF validation failed: Invalid referer format")
        })?;
        if !same_host(&referer_host, host) {
            return Err(AppError::forbidden("CSRF validation failed: Invalid referer"));
        }
    }

    Ok(())
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// `host[:port]` of a URL, with the scheme's default port left out.
fn authority_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn same_host(candidate: &str, host: Option<&str>) -> bool {
    host.is_some_and(|host| candidate.eq_ignore_ascii_case(host.trim()))
}

#[derive(Clone, Default)]
pub struct OriginGuardLayer;

impl OriginGuardLayer {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Clone)]
pub struct OriginGuard<S> {
    inner: S,
}

impl<S> Layer<S> for OriginGuardLayer {
    type Service = OriginGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OriginGuard { inner }
    }
}

impl<S> Service<Request<Body>> for OriginGuard<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if let Err(err) = check_origin(req.method(), req.headers()) {
            tracing::warn!(
                method = %req.method(),
                uri = %req.uri(),
                "blocked request: {err}"
            );
            return Box::pin(async move { Ok(err.into_response()) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
