//! Storage trait for click events and their aggregations.

use std::collections::BTreeMap;

use crate::domain::entities::{Click, NewClick};
use crate::domain::errors::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Bucket key to number of clicks. Buckets without clicks are absent.
pub type Counts = BTreeMap<String, i64>;

/// Append-only click event log plus read-side grouping queries.
///
/// All grouping queries use the half-open window `[from, to)` on
/// `accessed_at`. Day keys are `YYYY-MM-DD` and month keys `YYYY-MM`, in UTC.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickStore: Send + Sync {
    /// Appends a click event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the referenced link does not exist.
    async fn insert_click(&self, new_click: NewClick) -> Result<Click, StoreError>;

    /// Returns every click recorded for a link, newest first.
    async fn find_clicks_by_link_id(&self, link_id: i64) -> Result<Vec<Click>, StoreError>;

    async fn count_by_day(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError>;

    async fn count_by_month(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError>;

    async fn count_by_user_agent(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError>;
}
