//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /s/{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache first, then store)
/// 2. Queue a click event for the background worker
/// 3. Return 302 Found
///
/// The click is queued without waiting; when the queue is full it is dropped
/// and the redirect still succeeds.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let link = state
        .link_service
        .resolve_link(&code)
        .await?
        .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

    let event = ClickEvent::new(
        link.id,
        link.code,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );
    state.click_queue.submit(event);

    Ok((StatusCode::FOUND, [(header::LOCATION, link.original_url)]))
}
