//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::like_pattern;
use crate::domain::entities::{Link, NewLink};
use crate::domain::errors::StoreError;
use crate::domain::repositories::LinkStore;
use crate::utils::db_error::map_sqlx_error;

const LINK_COLUMNS: &str = "id, code, original_url, created_at, is_custom, click_count";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    original_url: String,
    created_at: DateTime<Utc>,
    is_custom: bool,
    click_count: i64,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.code,
            r.original_url,
            r.created_at,
            r.is_custom,
            r.click_count,
        )
    }
}

/// PostgreSQL store for links.
///
/// Uniqueness of `code` is enforced by the `links_code_key` constraint.
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_links(
        &self,
        sql: &str,
        pattern: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Link>, StoreError> {
        let query = sqlx::query_as::<_, LinkRow>(sql);
        let query = match pattern {
            Some(p) => query.bind(p).bind(limit),
            None => query.bind(limit),
        };

        let rows = query
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Link::from).collect())
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (code, original_url, is_custom)
            VALUES ($1, $2, $3)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.code)
        .bind(&new_link.original_url)
        .bind(new_link.is_custom)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Link::from))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Vec<Link>, StoreError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE original_url = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(original_url)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn increment_clicks(&self, link_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE id = $1")
            .bind(link_id)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Database(format!("link {} does not exist", link_id)));
        }

        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, StoreError> {
        self.fetch_links(
            &format!(
                "SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, id DESC LIMIT $1"
            ),
            None,
            limit,
        )
        .await
    }

    async fn search_by_code(&self, query: &str, limit: i64) -> Result<Vec<Link>, StoreError> {
        self.fetch_links(
            &format!(
                r#"
                SELECT {LINK_COLUMNS}
                FROM links
                WHERE code ILIKE $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
                "#
            ),
            Some(&like_pattern(query)),
            limit,
        )
        .await
    }

    async fn search_by_original_url(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Link>, StoreError> {
        self.fetch_links(
            &format!(
                r#"
                SELECT {LINK_COLUMNS}
                FROM links
                WHERE original_url ILIKE $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
                "#
            ),
            Some(&like_pattern(query)),
            limit,
        )
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
