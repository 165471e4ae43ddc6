//! Read-only projection of a link record for reporting.

use chrono::{DateTime, Utc};

use crate::domain::entities::{ClickEvent, LinkRecord};

/// Summary of a link and its full visit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub total_clicks: usize,
    pub clicks: Vec<ClickEvent>,
}

/// Derives [`StatsView`]s from records. Stateless.
pub struct StatsAggregator;

impl StatsAggregator {
    /// Projects a record without modifying it. Clicks keep arrival order.
    pub fn summarize(record: &LinkRecord) -> StatsView {
        StatsView {
            short_code: record.code.clone(),
            original_url: record.target_url.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            total_clicks: record.clicks.len(),
            clicks: record.clicks.clone(),
        }
    }
}
