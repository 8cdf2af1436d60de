//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// A visit recorded when a short link is resolved.
///
/// Click records are append-only. The client address is only ever stored as a
/// keyed hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_hash: String,
    pub referrer: Option<String>,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        link_id: i64,
        clicked_at: DateTime<Utc>,
        ip_hash: String,
        referrer: Option<String>,
    ) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            ip_hash,
            referrer,
        }
    }
}

/// Input data for recording a click.
///
/// `clicked_at` is captured at visit time, not at write time, so queueing delay in
/// the click worker does not skew timestamps.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_hash: String,
    pub referrer: Option<String>,
}
