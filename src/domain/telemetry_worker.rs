//! Background delivery of telemetry entries with bounded retries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tracing::{debug, warn};

use crate::domain::telemetry::{LogEntry, TelemetryError, TelemetrySink};

/// How often and how patiently a failed delivery is retried.
///
/// The n-th retry waits `backoff * n`, so with the defaults an entry is tried
/// at most three times over roughly one second.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delays between attempts, one per retry.
    pub fn delays(&self) -> Vec<Duration> {
        (1..=self.max_retries as u32)
            .map(|attempt| self.backoff * attempt)
            .collect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(300))
    }
}

/// Delivers one entry, retrying according to `policy`.
///
/// # Errors
///
/// Returns the last [`TelemetryError`] once every retry has failed.
pub async fn deliver_with_retry(
    sink: &dyn TelemetrySink,
    entry: &LogEntry,
    policy: &RetryPolicy,
) -> Result<(), TelemetryError> {
    Retry::start(policy.delays(), || sink.deliver(entry)).await
}

/// Drains the telemetry queue until every [`crate::domain::telemetry::Telemetry`]
/// handle is dropped, then waits for in-flight deliveries to finish.
///
/// At most `concurrency` entries are in flight at once, so a slow collector
/// backs up the queue instead of spawning unbounded tasks. Entries that still
/// fail after all retries are logged locally and dropped.
pub async fn run_telemetry_worker(
    mut rx: mpsc::Receiver<LogEntry>,
    sink: Arc<dyn TelemetrySink>,
    policy: RetryPolicy,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let limiter = Arc::new(Semaphore::new(concurrency));

    while let Some(entry) = rx.recv().await {
        let Ok(permit) = limiter.clone().acquire_owned().await else {
            break;
        };

        let sink = sink.clone();
        let policy = policy.clone();

        tokio::spawn(async move {
            if let Err(e) = deliver_with_retry(sink.as_ref(), &entry, &policy).await {
                metrics::counter!("telemetry_dropped_total").increment(1);
                warn!(
                    package = %entry.package,
                    "Dropping telemetry entry '{}' after {} retries: {}",
                    entry.message,
                    policy.max_retries,
                    e
                );
            }
            drop(permit);
        });
    }

    // Every permit back means every spawned delivery has finished.
    let _ = limiter.acquire_many(concurrency as u32).await;

    debug!("Telemetry worker stopped");
}
