//! Utility functions for code generation, input validation and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`link_input`] - Target URL and validity checks
//! - [`extract_host`] - Host extraction and short link formatting
//! - [`client_ip`] - Caller address for click events

pub mod client_ip;
pub mod code_generator;
pub mod extract_host;
pub mod link_input;

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
