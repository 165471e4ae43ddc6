//! DTO for a single recorded click.

use serde::Serialize;

use crate::domain::entities::ClickEvent;
use crate::utils::iso_millis;

/// One visit as reported by the stats endpoint.
///
/// Missing referrer or address is omitted rather than sent as `null`.
#[derive(Debug, Serialize)]
pub struct ClickInfo {
    pub timestamp: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl From<ClickEvent> for ClickInfo {
    fn from(event: ClickEvent) -> Self {
        Self {
            timestamp: iso_millis(event.timestamp),
            referrer: event.referrer,
            ip: event.source_address,
        }
    }
}
