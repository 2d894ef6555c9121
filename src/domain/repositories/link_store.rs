//! Storage trait for short links.

use crate::domain::entities::{Link, NewLink};
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable, authoritative mapping from short code to original URL.
///
/// Backends must enforce uniqueness of `code` themselves; the engine relies on
/// that constraint rather than on in-process locking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Inserts a new link; the store assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] if the code is already used.
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Returns every link pointing at `original_url`, newest first.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Vec<Link>, StoreError>;

    /// Adds one to the link's denormalized click counter.
    async fn increment_clicks(&self, link_id: i64) -> Result<(), StoreError>;

    /// Lists the most recently created links, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, StoreError>;

    /// Case-insensitive substring search over short codes, newest first.
    async fn search_by_code(&self, query: &str, limit: i64) -> Result<Vec<Link>, StoreError>;

    /// Case-insensitive substring search over original URLs, newest first.
    async fn search_by_original_url(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Link>, StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
