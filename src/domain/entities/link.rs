//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code mapped to its original URL.
///
/// `code`, `original_url` and `created_at` never change after insertion.
/// `click_count` is a denormalized counter maintained by the analytics path and
/// only approximates the number of recorded [`crate::domain::entities::Click`]s.
///
/// The cache stores a serialized copy of this struct as read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub is_custom: bool,
    pub click_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        original_url: String,
        created_at: DateTime<Utc>,
        is_custom: bool,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            code,
            original_url,
            created_at,
            is_custom,
            click_count,
        }
    }
}

/// Input data for creating a new link.
///
/// The store assigns `id` and `created_at`; `click_count` starts at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
    pub is_custom: bool,
}
