//! Link creation and resolution service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;

use crate::domain::entities::{Link, NewLink};
use crate::domain::errors::{LinkError, StoreError};
use crate::domain::repositories::LinkStore;
use crate::infrastructure::cache::LinkCache;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, validate_custom_code};
use crate::utils::url_validator::validate_url;

/// Fresh generations tried at one code length before growing it.
pub const MAX_ATTEMPTS_PER_LENGTH: usize = 10;

/// How many times the code length may grow by one before giving up.
pub const MAX_LENGTH_ESCALATIONS: usize = 3;

/// Tunables for [`LinkService`].
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Lifetime of cache entries written by the engine.
    pub cache_ttl: Duration,
    /// Deadline for each store or cache call on the request path.
    pub store_timeout: Duration,
    /// Length of generated codes before any escalation.
    pub code_length: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            store_timeout: Duration::from_secs(2),
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

/// Service for creating and resolving shortened links.
///
/// Reads go through the cache first and fall back to the store (cache-aside).
/// Writes go to the store first; the cache is only touched after the store
/// has committed, and cache failures never fail the operation.
pub struct LinkService {
    links: Arc<dyn LinkStore>,
    cache: Arc<dyn LinkCache>,
    options: EngineOptions,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(links: Arc<dyn LinkStore>, cache: Arc<dyn LinkCache>, options: EngineOptions) -> Self {
        Self {
            links,
            cache,
            options,
        }
    }

    /// Creates a short link, or returns the existing one for the same URL.
    ///
    /// # Order of checks
    ///
    /// 1. The URL and custom code are validated.
    /// 2. A custom code already in use fails with [`LinkError::CodeTaken`].
    /// 3. If links for `original_url` exist, the newest one is returned unchanged,
    ///    even when a different custom code was requested.
    /// 4. Otherwise the custom code is used, or a code is generated with
    ///    bounded retry and length escalation.
    /// 5. The link is inserted, then written to the cache.
    ///
    /// # Errors
    ///
    /// - [`LinkError::InvalidUrl`] / [`LinkError::InvalidCustomCode`] on bad input
    /// - [`LinkError::CodeTaken`] if the custom code is used, including when a
    ///   concurrent insert wins the race after the pre-check
    /// - [`LinkError::CodeSpaceExhausted`] if every generated code collided
    /// - [`LinkError::Store`] on store failures or timeouts
    pub async fn create_link(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
    ) -> Result<Link, LinkError> {
        let original_url = validate_url(original_url)?;
        let custom_code = custom_code.map(str::trim);

        if let Some(custom) = custom_code {
            validate_custom_code(custom)?;

            if self
                .with_deadline(self.links.find_by_code(custom))
                .await?
                .is_some()
            {
                return Err(LinkError::CodeTaken(custom.to_string()));
            }
        }

        let existing = self
            .with_deadline(self.links.find_by_original_url(&original_url))
            .await?;
        if let Some(link) = existing.into_iter().max_by_key(|l| (l.created_at, l.id)) {
            tracing::debug!(code = %link.code, "Reusing existing link for URL");
            self.cache_put(&link).await;
            return Ok(link);
        }

        let link = match custom_code {
            Some(custom) => self.insert_custom(custom, original_url).await?,
            None => self.insert_generated(original_url).await?,
        };

        metrics::counter!("links_created_total").increment(1);
        tracing::info!(code = %link.code, is_custom = link.is_custom, "Short link created");

        self.cache_put(&link).await;

        Ok(link)
    }

    /// Resolves a short code to its link.
    ///
    /// Returns `Ok(None)` when no link uses the code. Cache failures are
    /// treated as misses.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Store`] if the store fails or times out.
    pub async fn resolve_link(&self, code: &str) -> Result<Option<Link>, LinkError> {
        if let Some(link) = self.cache_get(code).await {
            return Ok(Some(link));
        }

        let Some(link) = self.with_deadline(self.links.find_by_code(code)).await? else {
            return Ok(None);
        };

        self.cache_put(&link).await;

        Ok(Some(link))
    }

    /// Lists the most recently created links, newest first.
    pub async fn last_links(&self, limit: i64) -> Result<Vec<Link>, LinkError> {
        Ok(self.with_deadline(self.links.list_recent(limit)).await?)
    }

    /// Finds links whose code contains `query`, ignoring case.
    pub async fn search_by_code(&self, query: &str, limit: i64) -> Result<Vec<Link>, LinkError> {
        Ok(self
            .with_deadline(self.links.search_by_code(query, limit))
            .await?)
    }

    /// Finds links whose original URL contains `query`, ignoring case.
    pub async fn search_by_original_url(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Link>, LinkError> {
        Ok(self
            .with_deadline(self.links.search_by_original_url(query, limit))
            .await?)
    }

    /// Loads the `limit` most recent links into the cache.
    ///
    /// Each store and cache call is retried up to three times with exponential
    /// backoff. Links that still cannot be cached are skipped.
    ///
    /// Returns the number of links written to the cache.
    pub async fn warm_cache(&self, limit: i64) -> Result<usize, LinkError> {
        if limit <= 0 {
            return Ok(0);
        }

        let links = Retry::start(retry_strategy(), || {
            self.with_deadline(self.links.list_recent(limit))
        })
        .await?;

        let mut warmed = 0;
        for link in &links {
            let result = Retry::start(retry_strategy(), || async {
                match timeout(
                    self.options.store_timeout,
                    self.cache.set_link(link, self.options.cache_ttl),
                )
                .await
                {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(_) => Err("cache write timed out".to_string()),
                }
            })
            .await;

            match result {
                Ok(()) => warmed += 1,
                Err(e) => tracing::warn!(code = %link.code, error = %e, "Skipping link during cache warm-up"),
            }
        }

        tracing::info!(warmed, total = links.len(), "Cache warm-up finished");
        Ok(warmed)
    }

    /// Checks that the link store answers within the deadline.
    pub async fn check_store(&self) -> Result<(), StoreError> {
        self.with_deadline(self.links.ping()).await
    }

    /// Checks the cache backend. Returns its name and whether it is healthy.
    pub async fn check_cache(&self) -> (&'static str, bool) {
        let healthy = timeout(self.options.store_timeout, self.cache.health_check())
            .await
            .unwrap_or(false);
        (self.cache.backend_name(), healthy)
    }

    async fn insert_custom(&self, code: &str, original_url: String) -> Result<Link, LinkError> {
        let new_link = NewLink {
            code: code.to_string(),
            original_url,
            is_custom: true,
        };

        match self.with_deadline(self.links.insert(new_link)).await {
            Ok(link) => Ok(link),
            Err(StoreError::UniqueViolation { .. }) => Err(LinkError::CodeTaken(code.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_generated(&self, original_url: String) -> Result<Link, LinkError> {
        let base_length = self.options.code_length;

        for length in base_length..=base_length + MAX_LENGTH_ESCALATIONS {
            for _ in 0..MAX_ATTEMPTS_PER_LENGTH {
                let code = generate_code(Some(length));

                if self
                    .with_deadline(self.links.find_by_code(&code))
                    .await?
                    .is_some()
                {
                    continue;
                }

                let new_link = NewLink {
                    code,
                    original_url: original_url.clone(),
                    is_custom: false,
                };

                match self.with_deadline(self.links.insert(new_link)).await {
                    Ok(link) => return Ok(link),
                    Err(StoreError::UniqueViolation { .. }) => continue,
                    Err(e) => return Err(e.into()),
                }
            }

            tracing::warn!(length, "Code length saturated, escalating");
        }

        tracing::error!(base_length, "Failed to generate a unique short code");
        Err(LinkError::CodeSpaceExhausted)
    }

    async fn with_deadline<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        timeout(self.options.store_timeout, operation)
            .await
            .unwrap_or(Err(StoreError::Timeout))
    }

    async fn cache_get(&self, code: &str) -> Option<Link> {
        match timeout(self.options.store_timeout, self.cache.get_link(code)).await {
            Ok(Ok(Some(link))) => {
                metrics::counter!("cache_hits_total").increment(1);
                tracing::debug!(code, "Cache hit");
                Some(link)
            }
            Ok(Ok(None)) => {
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
            Ok(Err(e)) => {
                metrics::counter!("cache_errors_total").increment(1);
                tracing::warn!(code, error = %e, "Cache read failed, falling back to store");
                None
            }
            Err(_) => {
                metrics::counter!("cache_errors_total").increment(1);
                tracing::warn!(code, "Cache read timed out, falling back to store");
                None
            }
        }
    }

    async fn cache_put(&self, link: &Link) {
        match timeout(
            self.options.store_timeout,
            self.cache.set_link(link, self.options.cache_ttl),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics::counter!("cache_errors_total").increment(1);
                tracing::warn!(code = %link.code, error = %e, "Failed to cache link");
            }
            Err(_) => {
                metrics::counter!("cache_errors_total").increment(1);
                tracing::warn!(code = %link.code, "Cache write timed out");
            }
        }
    }
}

/// 3 attempts, 100 ms then 200 ms apart.
fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(1))
        .take(2)
}
