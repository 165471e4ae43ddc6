//! DTOs for the link statistics endpoint.

use serde::Serialize;

use crate::api::dto::clicks::ClickInfo;
use crate::application::services::StatsView;
use crate::utils::iso_millis;

/// Full statistics for one link, including every click in arrival order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub created_at: String,
    pub expiry: String,
    pub total_clicks: usize,
    pub clicks: Vec<ClickInfo>,
}

impl From<StatsView> for StatsResponse {
    fn from(view: StatsView) -> Self {
        Self {
            short_code: view.short_code,
            original_url: view.original_url,
            created_at: iso_millis(view.created_at),
            expiry: iso_millis(view.expires_at),
            total_clicks: view.total_clicks,
            clicks: view.clicks.into_iter().map(ClickInfo::from).collect(),
        }
    }
}
