//! Domain layer containing business entities and contracts.
//!
//! Defines the link model, the storage contract, the time source and the
//! telemetry pipeline independently of HTTP and of any concrete storage.
//!
//! # Architecture
//!
//! - [`entities`] - Link records and click events
//! - [`repositories`] - Storage trait definitions
//! - [`clock`] - Injectable time source
//! - [`errors`] - Typed failures of the registry operations
//! - [`telemetry`] - Structured telemetry entries and the emitter handle
//! - [`telemetry_worker`] - Background delivery with bounded retries
//!
//! # Telemetry Flow
//!
//! 1. A service calls [`telemetry::Telemetry::emit`]
//! 2. The entry is queued on a bounded channel (dropped when full)
//! 3. [`telemetry_worker::run_telemetry_worker`] delivers it to a sink, retrying on failure

pub mod clock;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod telemetry;
pub mod telemetry_worker;
