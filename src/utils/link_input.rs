//! Validation of link creation inputs.

use chrono::Duration;
use url::Url;

use crate::domain::errors::ValidationError;

/// Validity applied when the caller does not supply one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// Longest permitted validity window (24 hours).
pub const MAX_VALIDITY_MINUTES: i64 = 24 * 60;

/// Checks that `url` parses as an absolute URL.
///
/// The URL is not rewritten; the registry stores exactly what was submitted.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidUrl`] for relative or malformed input.
pub fn validate_target_url(url: &str) -> Result<(), ValidationError> {
    Url::parse(url)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

/// Resolves the requested validity into a duration.
///
/// `None` yields the 30 minute default.
///
/// # Errors
///
/// Returns [`ValidationError::ValidityOutOfRange`] unless `1 <= minutes <= 1440`.
pub fn validity_window(minutes: Option<i64>) -> Result<Duration, ValidationError> {
    let minutes = minutes.unwrap_or(DEFAULT_VALIDITY_MINUTES);

    if !(1..=MAX_VALIDITY_MINUTES).contains(&minutes) {
        return Err(ValidationError::ValidityOutOfRange {
            value: minutes,
            min: 1,
            max: MAX_VALIDITY_MINUTES,
        });
    }

    Ok(Duration::minutes(minutes))
}
