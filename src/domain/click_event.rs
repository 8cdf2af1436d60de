//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory click event passed from the redirect path to the click worker.
///
/// Carries the already-hashed client fingerprint, so raw client addresses never
/// leave the request that observed them.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::RedirectService`] after a successful lookup
/// 2. Sent to the bounded channel with `try_send` (never awaited)
/// 3. Persisted by [`crate::domain::click_worker::run_click_worker`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_hash: String,
    pub referrer: Option<String>,
}

impl ClickEvent {
    /// Creates an event stamped with the current time.
    pub fn new(link_id: i64, ip_hash: String, referrer: Option<String>) -> Self {
        Self {
            link_id,
            clicked_at: Utc::now(),
            ip_hash,
            referrer,
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        NewClick {
            link_id: event.link_id,
            clicked_at: event.clicked_at,
            ip_hash: event.ip_hash,
            referrer: event.referrer,
        }
    }
}
