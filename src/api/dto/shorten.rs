//! DTOs for the link creation endpoint.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::code_generator::{CUSTOM_CODE_REGEX, is_reserved};

/// Request to create one short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    /// The original URL to shorten (must be absolute).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Lifetime in whole minutes. Defaults to 30 when omitted.
    #[validate(range(min = 1, max = 1440))]
    pub validity: Option<i64>,

    /// Optional custom short code. Route names such as `health` are refused.
    #[validate(
        regex(path = "*CUSTOM_CODE_REGEX"),
        custom(function = "reject_reserved_code")
    )]
    pub shortcode: Option<String>,
}

fn reject_reserved_code(code: &str) -> Result<(), ValidationError> {
    if is_reserved(code) {
        let mut err = ValidationError::new("reserved");
        err.message = Some("This code is reserved".into());
        return Err(err);
    }
    Ok(())
}

/// Created link as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlResponse {
    pub short_link: String,
    /// Expiry instant, ISO 8601 with milliseconds.
    pub expiry: String,
}
