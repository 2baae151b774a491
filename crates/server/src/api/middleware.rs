//! Authentication and metrics middleware for API routes.

use axum::{
    body::Body,
    extract::{FromRequestParts, MatchedPath, State},
    http::{request::Parts, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use reelhub_core::{AuthRequest, Grant, AUTH_HEADER};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::handlers::error_response;
use crate::metrics::{
    AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Metrics middleware that tracks HTTP request duration and counts.
///
/// This middleware records:
/// - Request duration (histogram)
/// - Request count (counter)
/// - Requests in flight (gauge)
///
/// The path label is the matched route template, so `/sources/alpha` is
/// counted as `/sources/{code}`.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Authorization middleware backed by the configured authenticator.
///
/// Reads the password from the `X-Auth-Password` header. A rejected request
/// gets 401 with `{"code":401,"msg":"unauthorized"}`; an accepted one
/// carries its [`Grant`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let credential = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let has_credential = credential.is_some();

    let grant = state.authenticator().authorize(&AuthRequest { credential });

    if !grant.valid {
        let reason = if has_credential {
            "invalid_password"
        } else {
            "missing_password"
        };
        AUTH_FAILURES_TOTAL.with_label_values(&[reason]).inc();
        debug!(reason = reason, path = %request.uri().path(), "Rejected request");
        return error_response(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    request.extensions_mut().insert(grant);
    next.run(request).await
}

/// Extractor for whether the caller may see adult sources.
///
/// Reads the [`Grant`] stored by [`auth_middleware`]. Falls back to `false`
/// if no grant is present.
#[derive(Debug, Clone, Copy)]
pub struct AdultPermission(pub bool);

impl<S> FromRequestParts<S> for AdultPermission
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let allowed = parts
            .extensions
            .get::<Grant>()
            .map(|grant| grant.adult_allowed)
            .unwrap_or(false);
        std::future::ready(Ok(AdultPermission(allowed)))
    }
}
