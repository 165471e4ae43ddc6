//! Handler for link creation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::shorten::{CreateShortUrlRequest, CreateShortUrlResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_host::{extract_host_from_headers, short_link};
use crate::utils::iso_millis;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /shorturls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "validity": 30,       // optional, minutes (1-1440)
///   "shortcode": "promo1" // optional, 4-10 of [a-z0-9]
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortLink": "http://localhost:3000/promo1",
///   "expiry": "2026-01-01T00:30:00.000Z"
/// }
/// ```
///
/// The link authority comes from the configured public base URL, otherwise
/// from the request `Host` header.
///
/// # Errors
///
/// Returns 400 Bad Request for malformed JSON or invalid fields.
/// Returns 409 Conflict if the requested shortcode is taken, even by an expired link.
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateShortUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let base_url = match &state.public_base_url {
        Some(base) => base.clone(),
        None => format!("http://{}", extract_host_from_headers(&headers)?),
    };

    let link = state
        .link_registry
        .create(payload.url, payload.validity, payload.shortcode)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateShortUrlResponse {
            short_link: short_link(&base_url, &link.code),
            expiry: iso_millis(link.expires_at),
        }),
    ))
}
