//! Click entity representing a single resolved visit.

use chrono::{DateTime, Utc};

/// A visit recorded when a short link is resolved.
///
/// Owned by its [`super::LinkRecord`] and never referenced elsewhere. Client
/// metadata is optional because callers may not send a referrer and the
/// network origin is not always known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub timestamp: DateTime<Utc>,
    pub referrer: Option<String>,
    pub source_address: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let click = ClickEvent::new(
    ///     Utc::now(),
    ///     Some("https://google.com"),
    ///     Some("192.168.1.1".to_string()),
    /// );
    /// ```
    pub fn new(
        timestamp: DateTime<Utc>,
        referrer: Option<&str>,
        source_address: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            referrer: referrer.map(|s| s.to_string()),
            source_address,
        }
    }
}
