//! Per-link click analytics.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::entities::{Click, Link};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Clicks aggregated into the daily and referrer breakdowns.
pub const AGGREGATION_WINDOW: i64 = 100;

/// Clicks returned verbatim as recent activity.
pub const RECENT_CLICKS: usize = 20;

/// Referrers reported in the top list.
pub const TOP_REFERRERS: usize = 10;

/// Label for clicks that carried no `Referer`.
pub const DIRECT_REFERRER: &str = "Direct";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: i64,
}

/// Analytics report for a single link.
#[derive(Debug, Clone)]
pub struct LinkAnalytics {
    pub link: Link,
    /// All clicks ever recorded.
    pub total_clicks: i64,
    /// Oldest day first.
    pub daily_clicks: Vec<DailyClicks>,
    /// Most frequent first.
    pub top_referrers: Vec<ReferrerCount>,
    /// Newest first.
    pub recent_clicks: Vec<Click>,
}

pub struct AnalyticsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L, C> AnalyticsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Builds the analytics report of a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn link_analytics(&self, id: i64) -> Result<LinkAnalytics, AppError> {
        let link = self
            .link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        let total_clicks = self.click_repository.count_for_link(id).await?;
        let window = self
            .click_repository
            .recent_for_link(id, AGGREGATION_WINDOW)
            .await?;

        Ok(summarize(link, total_clicks, window))
    }
}

/// Aggregates a newest-first window of clicks.
pub fn summarize(link: Link, total_clicks: i64, window: Vec<Click>) -> LinkAnalytics {
    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut per_referrer: HashMap<&str, i64> = HashMap::new();

    for click in &window {
        *per_day.entry(click.clicked_at.date_naive()).or_default() += 1;

        let referrer = click.referrer.as_deref().unwrap_or(DIRECT_REFERRER);
        *per_referrer.entry(referrer).or_default() += 1;
    }

    let daily_clicks = per_day
        .into_iter()
        .map(|(date, count)| DailyClicks { date, count })
        .collect();

    let mut top_referrers: Vec<ReferrerCount> = per_referrer
        .into_iter()
        .map(|(referrer, count)| ReferrerCount {
            referrer: referrer.to_string(),
            count,
        })
        .collect();
    // Ties broken by name so the order is stable.
    top_referrers.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.referrer.cmp(&b.referrer)));
    top_referrers.truncate(TOP_REFERRERS);

    let mut recent_clicks = window;
    recent_clicks.truncate(RECENT_CLICKS);

    LinkAnalytics {
        link,
        total_clicks,
        daily_clicks,
        top_referrers,
        recent_clicks,
    }
}
