//! Click recording.

use std::sync::Arc;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::errors::StoreError;
use crate::domain::repositories::{ClickStore, LinkStore};
use crate::infrastructure::cache::LinkCache;

/// Persists click events and keeps the denormalized counter in step.
///
/// Runs off the request path, driven by
/// [`crate::application::click_worker::run_click_worker`].
pub struct AnalyticsService {
    clicks: Arc<dyn ClickStore>,
    links: Arc<dyn LinkStore>,
    cache: Arc<dyn LinkCache>,
}

impl AnalyticsService {
    pub fn new(
        clicks: Arc<dyn ClickStore>,
        links: Arc<dyn LinkStore>,
        cache: Arc<dyn LinkCache>,
    ) -> Self {
        Self {
            clicks,
            links,
            cache,
        }
    }

    /// Records one click.
    ///
    /// Inserts the click row, then increments the link's `click_count` as a
    /// separate statement. The two writes are independent: a failure of one is
    /// logged and does not stop the other, so the counter can lag the event log.
    /// After a successful increment the cached copy of the link is dropped.
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub async fn record_click(&self, event: &ClickEvent) -> Result<(), StoreError> {
        let insert_result = self.clicks.insert_click(NewClick::from(event)).await;
        if let Err(e) = &insert_result {
            tracing::error!(
                link_id = event.link_id,
                code = %event.code,
                error = %e,
                "Failed to insert click event"
            );
        }

        let increment_result = self.links.increment_clicks(event.link_id).await;
        match &increment_result {
            Ok(()) => {
                if let Err(e) = self.cache.invalidate(&event.code).await {
                    tracing::warn!(code = %event.code, error = %e, "Failed to invalidate cached link");
                }
            }
            Err(e) => tracing::error!(
                link_id = event.link_id,
                code = %event.code,
                error = %e,
                "Failed to increment click counter"
            ),
        }

        insert_result?;
        increment_result?;

        tracing::debug!(link_id = event.link_id, "Click recorded");
        Ok(())
    }
}
