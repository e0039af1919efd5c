//! Youm's Interior storefront backend.
//!
//! Serves the public site and catalog JSON, and turns checkout and contact
//! submissions into notification emails. Exposed as a library so the
//! router can be tested and embedded.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Request, Response},
    middleware::from_fn,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Build the application router with its middleware stack.
///
/// Sentry layers are left to the binary so tests run without a client.
pub fn app(state: AppState) -> Router {
    let config = state.config();

    let mut api = routes::api_routes();
    if config.rate_limit_enabled {
        match middleware::api_rate_limiter() {
            Some(limiter) => api = api.layer(limiter),
            None => tracing::warn!("Rate limiter configuration rejected, /api is unlimited"),
        }
    }

    Router::new()
        .route("/health", get(routes::health))
        .nest("/api", api)
        .nest_service("/data", ServeDir::new(&config.data_dir))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::cors_layer(&config.allowed_origins))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}
