//! Typed failures returned by the link registry.
//!
//! The HTTP layer maps these onto status codes in [`crate::error::AppError`];
//! nothing in the core knows about HTTP.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Caller input that can never succeed as submitted. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid URL format: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Validity must be between {min} and {max} minutes, got {value}")]
    ValidityOutOfRange { value: i64, min: i64, max: i64 },

    #[error("Short code must be 4-10 lowercase letters or digits")]
    InvalidCode { code: String },
}

/// Failures of [`crate::application::services::LinkRegistry::create`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Shortcode already exists")]
    CodeConflict { code: String },

    /// Random code generation kept colliding. Internal; the caller did nothing wrong.
    #[error("Failed to generate a unique code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
}

/// Failures of the resolve and stats lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Short link not found")]
    NotFound { code: String },

    #[error("Short link expired")]
    Expired {
        code: String,
        expired_at: DateTime<Utc>,
    },
}

/// Storage-level outcomes reported by a [`crate::domain::repositories::LinkRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Code already stored: {code}")]
    Conflict { code: String },

    #[error("No record for code: {code}")]
    NotFound { code: String },
}
