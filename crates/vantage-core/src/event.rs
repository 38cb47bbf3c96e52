use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The payload the tracker script sends to POST /api/event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    pub domain: String,
    pub path: String,
    #[serde(default)]
    pub referrer: String,
    /// Combined screen resolution string, e.g. "1920x1080". Optional.
    #[serde(default)]
    pub screen_size: String,
}

/// The enriched, stored page view — mirrors the `page_views` table columns.
///
/// `visitor_hash` is the day-salted fingerprint; `created_at` is set by the
/// server at acceptance time and determines the dedup day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub domain: String,
    pub path: String,
    pub referrer: String,
    pub screen_size: String,
    pub country_code: String,
    pub browser: String,
    pub os: String,
    pub visitor_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PageView {
    /// The UTC calendar day this view counts against, formatted `YYYY-MM-DD`.
    /// Part of the storage uniqueness key (domain, path, visitor_hash, day).
    pub fn day(&self) -> String {
        self.created_at.date_naive().format("%Y-%m-%d").to_string()
    }
}
