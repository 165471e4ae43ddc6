//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (case-insensitive)
/// 2. Record a click with referrer and client address
/// 3. Return `302 Found` with `Location` set to the original URL
///
/// The referrer is read from `Referer`, falling back to the non-standard
/// `Referrer` spelling.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has expired. No click is recorded.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let link = state.link_registry.resolve(&code).await?;
    let location = location_header(&link.target_url)?;

    let referrer = headers
        .get(header::REFERER)
        .or_else(|| headers.get("referrer"))
        .and_then(|v| v.to_str().ok());
    let ip = client_ip(&headers, addr, state.behind_proxy);

    let event = state.click_recorder.capture(referrer, Some(ip));
    state.click_recorder.record(&link, event).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Uses the stored URL verbatim when it is a valid header value, otherwise its
/// ASCII serialization.
fn location_header(target_url: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(target_url) {
        return Ok(value);
    }

    Url::parse(target_url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "url": target_url }),
            )
        })
}
