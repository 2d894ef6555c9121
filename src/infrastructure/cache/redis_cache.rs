//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, LinkCache};
use crate::domain::entities::Link;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache storing each link as JSON under `link:{code}`.
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnects.
/// Errors are returned to the caller, which treats them as cache misses.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "link:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[async_trait]
impl LinkCache for RedisCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<Link>> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let payload = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        match payload {
            Some(json) => {
                let link = serde_json::from_str(&json)
                    .map_err(|e| CacheError::SerializationError(e.to_string()))?;
                debug!("Cache HIT: {}", code);
                Ok(Some(link))
            }
            None => {
                debug!("Cache MISS: {}", code);
                Ok(None)
            }
        }
    }

    async fn set_link(&self, link: &Link, ttl: Duration) -> CacheResult<()> {
        let key = self.build_key(&link.code);
        let payload =
            serde_json::to_string(link).map_err(|e| CacheError::SerializationError(e.to_string()))?;
        let ttl_seconds = ttl.as_secs().max(1);
        let mut conn = self.client.clone();

        conn.set_ex::<_, _, ()>(&key, payload, ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SET {}: {}", key, e)))?;

        debug!("Cache SET: {} (TTL: {}s)", link.code, ttl_seconds);
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("DEL {}: {}", key, e)))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
