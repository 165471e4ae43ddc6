//! Local telemetry sink used when no collector is configured.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::telemetry::{LogEntry, LogLevel, TelemetryError, TelemetrySink};

/// Writes entries to the process log through `tracing`. Never fails.
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        debug!("Using TracingSink (no telemetry collector configured)");
        Self
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySink for TracingSink {
    async fn deliver(&self, entry: &LogEntry) -> Result<(), TelemetryError> {
        let context = entry.context.to_string();
        let package = entry.package.as_str();

        match entry.level {
            LogLevel::Debug => debug!(target: "telemetry", package, context = %context, "{}", entry.message),
            LogLevel::Info => info!(target: "telemetry", package, context = %context, "{}", entry.message),
            LogLevel::Warn => warn!(target: "telemetry", package, context = %context, "{}", entry.message),
            LogLevel::Error => error!(
                target: "telemetry",
                package,
                context = %context,
                stack = entry.stack.as_deref().unwrap_or_default(),
                "{}",
                entry.message
            ),
        }

        Ok(())
    }
}
