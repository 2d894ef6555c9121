//! PostgreSQL implementation of the click store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::errors::StoreError;
use crate::domain::repositories::{ClickStore, Counts};
use crate::utils::db_error::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    accessed_at: DateTime<Utc>,
    user_agent: String,
    ip: Option<String>,
    referer: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click::new(r.id, r.link_id, r.accessed_at, r.user_agent, r.ip, r.referer)
    }
}

/// PostgreSQL store for click events and grouped counts.
///
/// Bucketing happens in SQL; timestamps are converted to UTC before formatting.
pub struct PgClickStore {
    pool: Arc<PgPool>,
}

impl PgClickStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Runs a `(bucket, total)` grouping over `[from, to)` for one link.
    async fn grouped_count(
        &self,
        bucket_expr: &str,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError> {
        let sql = format!(
            r#"
            SELECT {bucket_expr} AS bucket, COUNT(*) AS total
            FROM link_clicks
            WHERE link_id = $1
              AND accessed_at >= $2
              AND accessed_at < $3
            GROUP BY bucket
            "#
        );

        let rows = sqlx::query_as::<_, (String, i64)>(&sql)
            .bind(link_id)
            .bind(from)
            .bind(to)
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().collect())
    }
}

#[async_trait]
impl ClickStore for PgClickStore {
    async fn insert_click(&self, new_click: NewClick) -> Result<Click, StoreError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO link_clicks (link_id, accessed_at, user_agent, ip, referer)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, link_id, accessed_at, user_agent, ip, referer
            "#,
        )
        .bind(new_click.link_id)
        .bind(new_click.accessed_at)
        .bind(&new_click.user_agent)
        .bind(&new_click.ip)
        .bind(&new_click.referer)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_clicks_by_link_id(&self, link_id: i64) -> Result<Vec<Click>, StoreError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_id, accessed_at, user_agent, ip, referer
            FROM link_clicks
            WHERE link_id = $1
            ORDER BY accessed_at DESC, id DESC
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_by_day(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError> {
        self.grouped_count(
            "to_char(accessed_at AT TIME ZONE 'UTC', 'YYYY-MM-DD')",
            link_id,
            from,
            to,
        )
        .await
    }

    async fn count_by_month(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError> {
        self.grouped_count(
            "to_char(accessed_at AT TIME ZONE 'UTC', 'YYYY-MM')",
            link_id,
            from,
            to,
        )
        .await
    }

    async fn count_by_user_agent(
        &self,
        link_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Counts, StoreError> {
        self.grouped_count("user_agent", link_id, from, to).await
    }
}
