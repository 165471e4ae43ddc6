//! Structured telemetry entries and the fire-and-forget emitter.
//!
//! Services describe what happened with [`Telemetry::emit`]; the entry is
//! queued on a bounded channel and delivered by
//! [`crate::domain::telemetry_worker::run_telemetry_worker`] to whichever
//! [`TelemetrySink`] the server was started with.
//!
//! # Guarantees
//!
//! - `emit` never blocks and never fails the caller
//! - When the queue is full the entry is dropped and counted
//! - Entries with a non-lowercase package name are discarded

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use crate::domain::clock::{Clock, SystemClock};

/// Package name used for request-facing events such as link creation.
pub const SOURCE_CONTROLLER: &str = "controller";
/// Package name used by the HTTP request logger.
pub const SOURCE_MIDDLEWARE: &str = "middleware";
/// Package name used for internal faults in the core services.
pub const SOURCE_SERVICE: &str = "service";

/// Severity accepted by the collector. Serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One telemetry entry as sent to the collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub level: LogLevel,
    pub package: String,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub context: Value,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(
        level: LogLevel,
        package: &str,
        message: impl Into<String>,
        context: Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            stack: None,
            level,
            package: package.to_string(),
            message: message.into(),
            context,
            timestamp,
        }
    }

    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }
}

/// Errors raised while delivering an entry. Never surface past the worker.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry transport error: {0}")]
    Transport(String),

    #[error("Telemetry collector rejected entry with status {0}")]
    Rejected(u16),
}

/// Destination for telemetry entries.
///
/// # Implementations
///
/// - [`crate::infrastructure::telemetry::HttpSink`] - remote collector over HTTP
/// - [`crate::infrastructure::telemetry::TracingSink`] - local `tracing` output
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Delivers one entry. Called again by the worker on failure.
    async fn deliver(&self, entry: &LogEntry) -> Result<(), TelemetryError>;
}

/// Cheap, cloneable handle for emitting telemetry.
///
/// Entries are stamped with the handle's clock, the wall clock unless
/// replaced with [`Telemetry::with_clock`].
#[derive(Debug, Clone)]
pub struct Telemetry {
    sender: Option<mpsc::Sender<LogEntry>>,
    clock: Arc<dyn Clock>,
}

impl Telemetry {
    /// Creates an emitter backed by a bounded queue of `capacity` entries.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<LogEntry>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (
            Self {
                sender: Some(sender),
                clock: Arc::new(SystemClock),
            },
            receiver,
        )
    }

    /// An emitter that drops everything.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Stamps entries with `clock` instead of the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Queues an entry for delivery without waiting.
    pub fn emit(&self, level: LogLevel, package: &str, message: impl Into<String>, context: Value) {
        self.dispatch(LogEntry::new(
            level,
            package,
            message,
            context,
            self.clock.now(),
        ));
    }

    /// Queues an error-level entry carrying an optional stack or error chain.
    pub fn emit_error(
        &self,
        package: &str,
        message: impl Into<String>,
        stack: Option<String>,
        context: Value,
    ) {
        let entry = LogEntry::new(LogLevel::Error, package, message, context, self.clock.now());
        self.dispatch(entry.with_stack(stack));
    }

    /// Returns true when the delivery worker has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.as_ref().is_none_or(|s| s.is_closed())
    }

    /// Remaining queue slots, or `None` when telemetry is disabled.
    pub fn capacity(&self) -> Option<usize> {
        self.sender.as_ref().map(|s| s.capacity())
    }

    fn dispatch(&self, entry: LogEntry) {
        let Some(sender) = &self.sender else {
            return;
        };

        if entry.package.is_empty() || entry.package != entry.package.to_lowercase() {
            debug!("Discarding telemetry entry with invalid package '{}'", entry.package);
            return;
        }

        match sender.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                metrics::counter!("telemetry_dropped_total").increment(1);
                debug!("Telemetry queue full, dropping '{}'", entry.message);
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Telemetry worker stopped, dropping entry");
            }
        }
    }
}
