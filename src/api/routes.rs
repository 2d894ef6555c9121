//! API route configuration.

use crate::api::handlers::{
    analytics_handler, health_handler, links_handler, redirect_handler, search_handler,
    shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST /shorten`          - Create a short link
/// - `GET  /s/{code}`         - Redirect to the original URL
/// - `GET  /analytics/{code}` - Click analytics for one link
/// - `GET  /links`            - Most recent links
/// - `GET  /links/search`     - Search by code or original URL
/// - `GET  /health`           - Store, cache and click queue status
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/s/{code}", get(redirect_handler))
        .route("/analytics/{code}", get(analytics_handler))
        .route("/links", get(links_handler))
        .route("/links/search", get(search_handler))
        .route("/health", get(health_handler))
}
