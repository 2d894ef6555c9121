//! In-process cache backed by `moka`, with per-entry TTL and a size bound.

use super::service::{CacheResult, LinkCache};
use crate::config::MAX_CACHE_TTL_SECONDS;
use crate::domain::entities::Link;
use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::debug;

/// Entries held when no capacity is given.
pub const DEFAULT_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct CachedLink {
    link: Link,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct LinkExpiry;

impl Expiry<String, CachedLink> for LinkExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedLink,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedLink,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// A single-process cache holding links until their TTL elapses.
///
/// Expired entries are evicted by moka's housekeeping, and the least
/// valuable entries are evicted once `max_capacity` is reached. Not shared
/// between processes.
pub struct MemoryCache {
    inner: Cache<String, CachedLink>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        debug!("Using MemoryCache (in-process, max capacity {})", max_capacity);
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(LinkExpiry)
            .build();
        Self { inner }
    }

    /// Number of live entries, after pending evictions have run.
    pub async fn len(&self) -> usize {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl LinkCache for MemoryCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<Link>> {
        Ok(self.inner.get(code).await.map(|cached| cached.link))
    }

    async fn set_link(&self, link: &Link, ttl: Duration) -> CacheResult<()> {
        let cached = CachedLink {
            link: link.clone(),
            ttl: ttl.min(Duration::from_secs(MAX_CACHE_TTL_SECONDS)),
        };
        self.inner.insert(link.code.clone(), cached).await;
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        self.inner.invalidate(code).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_link(code: &str) -> Link {
        Link::new(
            1,
            code.to_string(),
            "https://example.com".to_string(),
            Utc::now(),
            false,
            0,
        )
    }

    #[tokio::test]
    async fn test_set_then_get_returns_same_link() {
        let cache = MemoryCache::default();
        let link = test_link("abc123");

        cache.set_link(&link, Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_link("abc123").await.unwrap(), Some(link));
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = MemoryCache::default();
        cache
            .set_link(&test_link("gone"), Duration::from_secs(60))
            .await
            .unwrap();

        cache.invalidate("gone").await.unwrap();

        assert!(cache.get_link("gone").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::default();
        cache
            .set_link(&test_link("ttl"), Duration::from_millis(100))
            .await
            .unwrap();
        assert!(cache.get_link("ttl").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(cache.get_link("ttl").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_released_without_reads() {
        let cache = MemoryCache::default();
        for i in 0..1_000 {
            cache
                .set_link(&test_link(&format!("code{i}")), Duration::from_millis(100))
                .await
                .unwrap();
        }

        let mut held = cache.len().await;
        for _ in 0..25 {
            if held == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
            held = cache.len().await;
        }

        assert_eq!(held, 0);
    }

    #[tokio::test]
    async fn test_capacity_bounds_entry_count() {
        let cache = MemoryCache::new(10);
        for i in 0..100 {
            cache
                .set_link(&test_link(&format!("code{i}")), Duration::from_secs(60))
                .await
                .unwrap();
        }

        assert!(cache.len().await <= 10);
    }

    #[tokio::test]
    async fn test_huge_ttl_is_clamped() {
        let cache = MemoryCache::default();
        let link = test_link("forever");

        cache
            .set_link(&link, Duration::from_secs(u64::MAX))
            .await
            .unwrap();

        assert_eq!(cache.get_link("forever").await.unwrap(), Some(link));
    }
}
