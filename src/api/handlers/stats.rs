//! Handler for link statistics endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::application::services::StatsAggregator;
use crate::error::AppError;
use crate::state::AppState;

/// Returns creation data and the full click history for a link.
///
/// # Endpoint
///
/// `GET /shorturls/{code}/stats`
///
/// Expired links are still reported. Viewing stats never records a click.
///
/// # Response
///
/// ```json
/// {
///   "shortCode": "promo1",
///   "originalUrl": "https://example.com",
///   "createdAt": "2026-01-01T00:00:00.000Z",
///   "expiry": "2026-01-01T00:30:00.000Z",
///   "totalClicks": 1,
///   "clicks": [
///     { "timestamp": "2026-01-01T00:05:00.000Z", "referrer": "https://news.example", "ip": "10.0.0.1" }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code was never created.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let record = state.link_registry.lookup_for_stats(&code).await?;

    Ok(Json(StatsAggregator::summarize(&record).into()))
}
