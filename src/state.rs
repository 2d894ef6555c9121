//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::click_worker::ClickQueue;
use crate::application::services::{LinkService, StatsService};

/// Everything a handler needs, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub click_queue: ClickQueue,
    /// Prefix for rendered short URLs, without trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        stats_service: Arc<StatsService>,
        click_queue: ClickQueue,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service,
            stats_service,
            click_queue,
            base_url: base_url.into(),
        }
    }

    /// Full short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/s/{}", self.base_url.trim_end_matches('/'), code)
    }
}
