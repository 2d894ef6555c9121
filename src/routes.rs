//! Top-level router: API routes plus cross-cutting middleware.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Whole-request deadline (408 on expiry)
//! - **Path normalization** - Trailing slash handling

use std::time::Duration;

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Constructs the application router with all routes and middleware.
///
/// `request_timeout` bounds each request end to end. Click recording is not
/// affected: it runs on the background worker with its own timeout.
pub fn app_router(state: AppState, request_timeout: Duration) -> NormalizePath<Router> {
    let router = api::routes::routes()
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
