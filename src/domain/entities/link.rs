//! Link entity representing a short code and its visit history.

use chrono::{DateTime, Duration, Utc};

use super::ClickEvent;

/// Lifecycle state of a link, derived from the clock on every read.
///
/// Transitions only from `Active` to `Expired` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Active,
    Expired,
}

/// A short link with its destination, validity window and click history.
///
/// `code`, `target_url`, `created_at` and `expires_at` never change after
/// creation. `clicks` is append-only and kept in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub clicks: Vec<ClickEvent>,
}

impl LinkRecord {
    /// Creates a record with no clicks, expiring `validity` after `created_at`.
    pub fn new(
        code: String,
        target_url: String,
        created_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            code,
            target_url,
            created_at,
            expires_at: created_at + validity,
            clicks: Vec::new(),
        }
    }

    /// Returns true once `now` has reached `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns the lifecycle state at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> LinkStatus {
        if self.is_expired_at(now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }

    /// Number of recorded visits.
    pub fn total_clicks(&self) -> usize {
        self.clicks.len()
    }
}
