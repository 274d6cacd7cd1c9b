//! Request middleware: timestamping, logging and the placeholder auth gate.
//!
//! Each function plugs into the router through `axum::middleware::from_fn`.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::error::ApiError;

/// Header the placeholder auth gate inspects.
pub const AUTH_HEADER: &str = "x-authenticated";

/// When the request entered the server, as a UTC RFC 2822 string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTime(pub String);

/// Stamps the request with a [`RequestTime`] extension.
pub async fn timestamp(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(RequestTime(Utc::now().to_rfc2822()));

    next.run(request).await
}

/// Logs the path, method and request time of every request.
pub async fn logger(request: Request, next: Next) -> Response {
    let request_time = request
        .extensions()
        .get::<RequestTime>()
        .map(|time| time.0.clone())
        .unwrap_or_default();

    tracing::info!(
        path = %request.uri().path(),
        method = %request.method(),
        request_time = %request_time,
        "request"
    );

    next.run(request).await
}

/// Placeholder authentication: everything passes unless the client
/// explicitly sends `x-authenticated: false`.
pub async fn mock_auth(request: Request, next: Next) -> Response {
    let denied = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("false"));

    if denied {
        return ApiError::NotAuthorized.into_response();
    }

    next.run(request).await
}
