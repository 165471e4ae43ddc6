//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for record storage and telemetry delivery.
//!
//! # Modules
//!
//! - [`persistence`] - In-memory repository implementation
//! - [`telemetry`] - Telemetry sinks (remote HTTP collector and local tracing)

pub mod persistence;
pub mod telemetry;
