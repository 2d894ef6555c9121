//! Link cache trait and error types.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::domain::entities::Link;

/// Errors that can occur during cache operations.
///
/// Never propagated past the engine: callers log them and fall back to the store.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
    SerializationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
            Self::SerializationError(e) => write!(f, "Cache serialization error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Fast, TTL-bounded mirror of recently used links, keyed by short code.
///
/// The cache is never authoritative. Entries are whole [`Link`] values copied
/// from the store and are replaced or removed, never partially updated.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Retrieves the cached link for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss or expired entry
    async fn get_link(&self, code: &str) -> CacheResult<Option<Link>>;

    /// Stores a link under its code for `ttl`.
    async fn set_link(&self, link: &Link, ttl: Duration) -> CacheResult<()>;

    /// Removes the cached copy of a link, if any.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name reported by the health endpoint.
    fn backend_name(&self) -> &'static str;
}
