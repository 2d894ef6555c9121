//! Handler for per-link analytics.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::analytics::{AnalyticsQuery, AnalyticsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns click analytics for one link.
///
/// # Endpoint
///
/// `GET /analytics/{code}?from=<rfc3339>&to=<rfc3339>`
///
/// Without bounds the window is the last month up to now. Groupings cover
/// `[from, to)`; the click list covers all time.
///
/// # Errors
///
/// - 400 if `from` is after `to`
/// - 404 if the code is unknown
pub async fn analytics_handler(
    Path(code): Path<String>,
    Query(query): Query<AnalyticsQuery>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let report = state
        .stats_service
        .get_analytics(&code, query.from, query.to)
        .await?;

    let short_url = state.short_url(&report.link.code);
    Ok(Json(AnalyticsResponse::new(report, short_url)))
}
