//! Telemetry sink implementations.
//!
//! - [`HttpSink`] - Posts entries to a remote collector
//! - [`TracingSink`] - Writes entries to the local log

pub mod http_sink;
pub mod tracing_sink;

pub use http_sink::HttpSink;
pub use tracing_sink::TracingSink;
