//! DTOs for the analytics endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::AnalyticsReport;
use crate::domain::entities::Click;
use crate::domain::repositories::Counts;

/// Optional RFC 3339 bounds of the `[from, to)` window.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    /// Denormalized counter; may lag `total_clicks`.
    pub click_count: i64,
    pub total_clicks: usize,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub by_day: Counts,
    pub by_month: Counts,
    pub by_user_agent: Counts,
    pub clicks: Vec<ClickItem>,
}

#[derive(Debug, Serialize)]
pub struct ClickItem {
    pub accessed_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: Option<String>,
    pub referer: Option<String>,
}

impl From<Click> for ClickItem {
    fn from(click: Click) -> Self {
        Self {
            accessed_at: click.accessed_at,
            user_agent: click.user_agent,
            ip: click.ip,
            referer: click.referer,
        }
    }
}

impl AnalyticsResponse {
    pub fn new(report: AnalyticsReport, short_url: String) -> Self {
        Self {
            code: report.link.code,
            short_url,
            original_url: report.link.original_url,
            created_at: report.link.created_at,
            click_count: report.link.click_count,
            total_clicks: report.clicks.len(),
            from: report.from,
            to: report.to,
            by_day: report.by_day,
            by_month: report.by_month,
            by_user_agent: report.by_user_agent,
            clicks: report.clicks.into_iter().map(ClickItem::from).collect(),
        }
    }
}
