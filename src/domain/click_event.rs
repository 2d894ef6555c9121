//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory representation of a redirect, queued for the analytics worker.
///
/// Built by the redirect handler from request metadata and handed to
/// [`crate::application::click_worker::ClickQueue`] so the response never waits
/// on analytics writes. `code` travels along so the recorder can invalidate the
/// cached copy of the link after bumping its counter.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    pub code: String,
    pub accessed_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// A missing `User-Agent` is stored as an empty string.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     42,
    ///     "abc123".to_string(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    /// );
    /// ```
    pub fn new(
        link_id: i64,
        code: String,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            code,
            accessed_at: Utc::now(),
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip,
            referer: referer.map(|s| s.to_string()),
        }
    }
}

impl From<&ClickEvent> for NewClick {
    fn from(event: &ClickEvent) -> Self {
        Self {
            link_id: event.link_id,
            accessed_at: event.accessed_at,
            user_agent: event.user_agent.clone(),
            ip: event.ip.clone(),
            referer: event.referer.clone(),
        }
    }
}
