//! Link representation returned by the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub is_custom: bool,
    pub click_count: i64,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            short_url,
            original_url: link.original_url,
            created_at: link.created_at,
            is_custom: link.is_custom,
            click_count: link.click_count,
        }
    }
}

/// A page of links, newest first.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}
