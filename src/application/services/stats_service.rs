//! Click analytics for a single link.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};

use crate::domain::entities::{Click, Link};
use crate::domain::errors::LinkError;
use crate::domain::repositories::{ClickStore, Counts, LinkStore};

/// Everything known about one link's clicks within a time window.
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub link: Link,
    /// All recorded clicks, newest first.
    pub clicks: Vec<Click>,
    pub by_day: Counts,
    pub by_month: Counts,
    pub by_user_agent: Counts,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Read-side service over the click log.
///
/// Always reads the store, never the cache.
pub struct StatsService {
    links: Arc<dyn LinkStore>,
    clicks: Arc<dyn ClickStore>,
}

impl StatsService {
    pub fn new(links: Arc<dyn LinkStore>, clicks: Arc<dyn ClickStore>) -> Self {
        Self { links, clicks }
    }

    /// Builds the analytics report for `code` over `[from, to)`.
    ///
    /// `to` defaults to now and `from` to one month before `to`.
    ///
    /// # Errors
    ///
    /// - [`LinkError::InvalidTimeRange`] if `from` is after `to`
    /// - [`LinkError::NotFound`] if no link uses the code
    /// - [`LinkError::Store`] on store failures
    pub async fn get_analytics(
        &self,
        code: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<AnalyticsReport, LinkError> {
        let (from, to) = resolve_window(from, to)?;

        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;

        let (clicks, by_day, by_month, by_user_agent) = tokio::try_join!(
            self.clicks.find_clicks_by_link_id(link.id),
            self.clicks.count_by_day(link.id, from, to),
            self.clicks.count_by_month(link.id, from, to),
            self.clicks.count_by_user_agent(link.id, from, to),
        )?;

        Ok(AnalyticsReport {
            link,
            clicks,
            by_day,
            by_month,
            by_user_agent,
            from,
            to,
        })
    }
}

fn resolve_window(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), LinkError> {
    let to = to.unwrap_or_else(Utc::now);
    let from = match from {
        Some(from) => from,
        None => to
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| LinkError::InvalidTimeRange("'to' is out of range".to_string()))?,
    };

    if from > to {
        return Err(LinkError::InvalidTimeRange(
            "'from' must not be after 'to'".to_string(),
        ));
    }

    Ok((from, to))
}
