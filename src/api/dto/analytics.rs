//! DTOs for the link analytics endpoint.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::api::dto::links::LinkResponse;
use crate::application::services::analytics_service::{DIRECT_REFERRER, LinkAnalytics};

#[derive(Debug, Serialize)]
pub struct DailyClicksItem {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct ReferrerItem {
    pub referrer: String,
    pub count: i64,
}

/// Click as shown in recent activity. The address fingerprint is not exposed;
/// a missing referrer reads as `Direct`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClickItem {
    pub clicked_at: DateTime<Utc>,
    pub referrer: String,
}

/// Response of `GET /api/links/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalyticsResponse {
    pub link: LinkResponse,
    pub total_clicks: i64,
    pub daily_clicks: Vec<DailyClicksItem>,
    pub top_referrers: Vec<ReferrerItem>,
    pub recent_clicks: Vec<RecentClickItem>,
}

impl LinkAnalyticsResponse {
    pub fn new(analytics: LinkAnalytics, short_url: String) -> Self {
        Self {
            link: LinkResponse::new(analytics.link, short_url),
            total_clicks: analytics.total_clicks,
            daily_clicks: analytics
                .daily_clicks
                .into_iter()
                .map(|d| DailyClicksItem {
                    date: d.date,
                    count: d.count,
                })
                .collect(),
            top_referrers: analytics
                .top_referrers
                .into_iter()
                .map(|r| ReferrerItem {
                    referrer: r.referrer,
                    count: r.count,
                })
                .collect(),
            recent_clicks: analytics
                .recent_clicks
                .into_iter()
                .map(|c| RecentClickItem {
                    clicked_at: c.clicked_at,
                    referrer: c
                        .referrer
                        .unwrap_or_else(|| DIRECT_REFERRER.to_string()),
                })
                .collect(),
        }
    }
}
