//! HTTP middleware for request processing.
//!
//! Provides process-level tracing spans and the telemetry request logger.

pub mod request_log;
pub mod tracing;
