//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// A click event recorded when a shortened link is accessed.
///
/// Immutable once stored. `user_agent` is empty when the client sent no
/// `User-Agent` header so that grouping by user agent always has a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub accessed_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: Option<String>,
    pub referer: Option<String>,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        link_id: i64,
        accessed_at: DateTime<Utc>,
        user_agent: String,
        ip: Option<String>,
        referer: Option<String>,
    ) -> Self {
        Self {
            id,
            link_id,
            accessed_at,
            user_agent,
            ip,
            referer,
        }
    }
}

/// Input data for recording a new click event.
///
/// `link_id` must reference an existing link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub accessed_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: Option<String>,
    pub referer: Option<String>,
}
