//! # TTL Shortener
//!
//! An in-memory URL shortening service with expiring links and per-link
//! click analytics, built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link records, clock, telemetry and repository traits
//! - **Application Layer** ([`application`]) - Link registry, click recording, stats
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory storage and telemetry sinks
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Custom or generated short codes (`[a-z0-9]`)
//! - Links expire after a validity window (1 minute to 24 hours)
//! - Click history with timestamp, referrer and client address
//! - Fire-and-forget telemetry with bounded retries
//!
//! ## Quick Start
//!
//! ```bash
//! export LISTEN="0.0.0.0:3000"
//! export LOG_ENDPOINT="https://collector.example/logs"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ClickRecorder, LinkRegistry, StatsAggregator};
    pub use crate::domain::clock::{Clock, ManualClock, SystemClock};
    pub use crate::domain::entities::{ClickEvent, LinkRecord, LinkStatus};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::InMemoryLinkRepository;
    pub use crate::state::AppState;
}
