//! In-process implementation of both storage traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::errors::StoreError;
use crate::domain::repositories::{ClickStore, Counts, LinkStore};

#[derive(Default)]
struct Tables {
    links: Vec<Link>,
    clicks: Vec<Click>,
}

/// A [`LinkStore`] and [`ClickStore`] kept in memory.
///
/// Enforces the same uniqueness and foreign-key rules as the PostgreSQL schema.
/// Used by tests and local experiments; data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with [`StoreError::Database`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of click events recorded so far.
    pub async fn click_rows(&self) -> usize {
        self.tables.lock().await.clicks.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database("store unavailable".to_string()));
        }
        Ok(())
    }

    async fn count_by<F>(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        bucket: F,
    ) -> Result<Counts, StoreError>
    where
        F: Fn(&Click) -> String + Send,
    {
        self.check_available()?;
        let tables = self.tables.lock().await;

        let mut counts = Counts::new();
        for click in tables
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id && c.accessed_at >= from && c.accessed_at < to)
        {
            *counts.entry(bucket(click)).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn search<F>(&self, limit: i64, matches: F) -> Result<Vec<Link>, StoreError>
    where
        F: Fn(&Link) -> bool + Send,
    {
        self.check_available()?;
        let tables = self.tables.lock().await;

        let mut found: Vec<Link> = tables.links.iter().filter(|l| matches(l)).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        if tables.links.iter().any(|l| l.code == new_link.code) {
            return Err(StoreError::UniqueViolation {
                constraint: "links_code_key".to_string(),
            });
        }

        let link = Link::new(
            tables.links.len() as i64 + 1,
            new_link.code,
            new_link.original_url,
            Utc::now(),
            new_link.is_custom,
            0,
        );
        tables.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.links.iter().find(|l| l.code == code).cloned())
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Vec<Link>, StoreError> {
        self.search(i64::MAX, |l| l.original_url == original_url).await
    }

    async fn increment_clicks(&self, link_id: i64) -> Result<(), StoreError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        match tables.links.iter_mut().find(|l| l.id == link_id) {
            Some(link) => {
                link.click_count += 1;
                Ok(())
            }
            None => Err(StoreError::Database(format!(
                "link {} does not exist",
                link_id
            ))),
        }
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, StoreError> {
        self.search(limit, |_| true).await
    }

    async fn search_by_code(&self, query: &str, limit: i64) -> Result<Vec<Link>, StoreError> {
        let needle = query.to_lowercase();
        self.search(limit, |l| l.code.to_lowercase().contains(&needle))
            .await
    }

    async fn search_by_original_url(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Link>, StoreError> {
        let needle = query.to_lowercase();
        self.search(limit, |l| l.original_url.to_lowercase().contains(&needle))
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[async_trait]
impl ClickStore for MemoryStore {
    async fn insert_click(&self, new_click: NewClick) -> Result<Click, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        if !tables.links.iter().any(|l| l.id == new_click.link_id) {
            return Err(StoreError::Database(format!(
                "link {} does not exist",
                new_click.link_id
            )));
        }

        let click = Click::new(
            tables.clicks.len() as i64 + 1,
            new_click.link_id,
            new_click.accessed_at,
            new_click.user_agent,
            new_click.ip,
            new_click.referer,
        );
        tables.clicks.push(click.clone());
        Ok(click)
    }

    async fn find_clicks_by_link_id(&self, link_id: i64) -> Result<Vec<Click>, StoreError> {
        self.check_available()?;
        let tables = self.tables.lock().await;

        let mut clicks: Vec<Click> = tables
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.accessed_at.cmp(&a.accessed_at).then(b.id.cmp(&a.id)));
        Ok(clicks)
    }

    async fn count_by_day(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError> {
        self.count_by(link_id, from, to, |c| {
            c.accessed_at.format("%Y-%m-%d").to_string()
        })
        .await
    }

    async fn count_by_month(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError> {
        self.count_by(link_id, from, to, |c| c.accessed_at.format("%Y-%m").to_string())
            .await
    }

    async fn count_by_user_agent(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError> {
        self.count_by(link_id, from, to, |c| c.user_agent.clone())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_link(code: &str, url: &str) -> NewLink {
        NewLink {
            code: code.to_string(),
            original_url: url.to_string(),
            is_custom: false,
        }
    }

    fn click_at(link_id: i64, at: DateTime<Utc>, ua: &str) -> NewClick {
        NewClick {
            link_id,
            accessed_at: at,
            user_agent: ua.to_string(),
            ip: None,
            referer: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = MemoryStore::new();
        store.insert(new_link("abc", "https://a.com")).await.unwrap();

        let err = store
            .insert(new_link("abc", "https://b.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation { .. }));
        let kept = store.find_by_code("abc").await.unwrap().unwrap();
        assert_eq!(kept.original_url, "https://a.com");
    }

    #[tokio::test]
    async fn test_insert_click_requires_existing_link() {
        let store = MemoryStore::new();
        let err = store
            .insert_click(click_at(99, Utc::now(), "bot"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[tokio::test]
    async fn test_grouped_counts_use_half_open_window() {
        let store = MemoryStore::new();
        let link = store.insert(new_link("abc", "https://a.com")).await.unwrap();

        let day1 = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        store.insert_click(click_at(link.id, day1, "curl")).await.unwrap();
        store.insert_click(click_at(link.id, day2, "curl")).await.unwrap();
        store.insert_click(click_at(link.id, day2, "firefox")).await.unwrap();

        let from = day1 - Duration::hours(1);
        let to = day2;

        let by_day = store.count_by_day(link.id, from, to).await.unwrap();
        assert_eq!(by_day.len(), 1);
        assert_eq!(by_day["2025-01-31"], 1);

        let all = day2 + Duration::hours(1);
        let by_month = store.count_by_month(link.id, from, all).await.unwrap();
        assert_eq!(by_month["2025-01"], 1);
        assert_eq!(by_month["2025-02"], 2);

        let by_ua = store.count_by_user_agent(link.id, from, all).await.unwrap();
        assert_eq!(by_ua["curl"], 2);
        assert_eq!(by_ua["firefox"], 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_limited() {
        let store = MemoryStore::new();
        store.insert(new_link("AbC1", "https://Example.com/x")).await.unwrap();
        store.insert(new_link("abc2", "https://example.com/y")).await.unwrap();
        store.insert(new_link("zzz", "https://other.org")).await.unwrap();

        let by_code = store.search_by_code("ABC", 10).await.unwrap();
        assert_eq!(by_code.len(), 2);

        let by_url = store.search_by_original_url("EXAMPLE", 1).await.unwrap();
        assert_eq!(by_url.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(store.ping().await.is_err());
        assert!(store.find_by_code("x").await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
