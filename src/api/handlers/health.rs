//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: round-trip to the link store
/// 2. **Cache**: backend health check (always ok when caching is off)
/// 3. **Click Queue**: worker alive, free slots and dropped events
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = match state.link_service.check_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Store error: {}", e)),
    };

    let cache = match state.link_service.check_cache().await {
        (backend, true) => CheckStatus::ok(format!("Backend: {}", backend)),
        (backend, false) => CheckStatus::error(format!("Backend {} unreachable", backend)),
    };

    let queue = &state.click_queue;
    let click_queue = if queue.is_closed() {
        CheckStatus::error("Click worker stopped")
    } else {
        CheckStatus::ok(format!(
            "Free: {}/{}, dropped: {}",
            queue.capacity(),
            queue.max_capacity(),
            queue.dropped()
        ))
    };

    let all_healthy = store.is_ok() && cache.is_ok() && click_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            store,
            cache,
            click_queue,
        },
    };

    let status = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
