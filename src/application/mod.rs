//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the injected clock, and expose the
//! three operations the HTTP layer needs: create a link, resolve and record a
//! visit, and report stats.
//!
//! # Available Services
//!
//! - [`services::link_registry::LinkRegistry`] - Creation, resolution and stats lookup
//! - [`services::click_recorder::ClickRecorder`] - Visit recording
//! - [`services::stats_aggregator::StatsAggregator`] - Stats projection

pub mod services;
