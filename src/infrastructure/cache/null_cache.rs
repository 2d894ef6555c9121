//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, LinkCache};
use crate::domain::entities::Link;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every lookup misses, so the engine always reads the store.
///
/// # Use Cases
///
/// - Deployments without Redis
/// - Fallback when the Redis connection fails at startup
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for NullCache {
    async fn get_link(&self, _code: &str) -> CacheResult<Option<Link>> {
        Ok(None)
    }

    async fn set_link(&self, _link: &Link, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
