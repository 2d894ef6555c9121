//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::shorten::ShortenRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link, or returns the existing one for the same URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com/a", "custom_short": "promo" }
/// ```
///
/// # Errors
///
/// - 400 if the URL or custom code is invalid
/// - 409 if the custom code is taken
/// - 500 on store failures
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&payload.original_url, payload.custom_short.as_deref())
        .await?;

    let short_url = state.short_url(&link.code);
    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}
