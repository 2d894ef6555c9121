//! Handlers for listing and searching links.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{LinkListResponse, LinkResponse};
use crate::api::dto::search::{DEFAULT_LIMIT, LinksQuery, SearchQuery};
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the most recently created links.
///
/// # Endpoint
///
/// `GET /links?limit=20`
pub async fn links_handler(
    Query(query): Query<LinksQuery>,
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    query.validate()?;

    let links = state
        .link_service
        .last_links(query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;

    Ok(Json(to_list(&state, links)))
}

/// Searches links by code or by original URL.
///
/// # Endpoint
///
/// `GET /links/search?code=abc` or `GET /links/search?url=example.com`
///
/// Matching is a case-insensitive substring match, newest first.
///
/// # Errors
///
/// Returns 400 unless exactly one of `code` and `url` is given.
pub async fn search_handler(
    Query(query): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    query.validate()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let links = match (query.code.as_deref(), query.url.as_deref()) {
        (Some(code), None) => state.link_service.search_by_code(code, limit).await?,
        (None, Some(url)) => state.link_service.search_by_original_url(url, limit).await?,
        _ => {
            return Err(AppError::bad_request(
                "Exactly one of 'code' or 'url' is required",
                json!({}),
            ));
        }
    };

    Ok(Json(to_list(&state, links)))
}

fn to_list(state: &AppState, links: Vec<Link>) -> LinkListResponse {
    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.code);
            LinkResponse::new(link, short_url)
        })
        .collect();

    LinkListResponse {
        total: items.len(),
        items,
    }
}
