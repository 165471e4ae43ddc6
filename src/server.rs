//! HTTP server initialization and runtime setup.
//!
//! Handles telemetry sink selection, worker spawning, registry construction,
//! and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::clock::SystemClock;
use crate::domain::telemetry::{Telemetry, TelemetrySink};
use crate::domain::telemetry_worker::{RetryPolicy, run_telemetry_worker};
use crate::infrastructure::persistence::InMemoryLinkRepository;
use crate::infrastructure::telemetry::{HttpSink, TracingSink};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Time allowed for queued telemetry to drain after the server stops.
const TELEMETRY_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Telemetry sink (HTTP collector, or local log fallback)
/// - Background telemetry worker
/// - In-memory link registry
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - The telemetry endpoint cannot be used
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let sink: Arc<dyn TelemetrySink> = match &config.telemetry.endpoint {
        Some(endpoint) => {
            let sink = HttpSink::new(
                endpoint,
                config.telemetry.api_key.clone(),
                config.telemetry.timeout(),
            )
            .context("Failed to configure telemetry collector")?;
            tracing::info!("Telemetry enabled ({})", sink.endpoint());
            Arc::new(sink)
        }
        None => {
            tracing::info!("Telemetry collector not configured, using local log");
            Arc::new(TracingSink::new())
        }
    };

    let (telemetry, telemetry_rx) = Telemetry::channel(config.telemetry.queue_capacity);
    let policy = RetryPolicy::new(config.telemetry.max_retries, config.telemetry.backoff());
    let worker = tokio::spawn(run_telemetry_worker(
        telemetry_rx,
        sink,
        policy,
        config.telemetry.concurrency,
    ));
    tracing::info!("Telemetry worker started");

    let repository = Arc::new(InMemoryLinkRepository::new());
    let state = AppState::new(repository, Arc::new(SystemClock), telemetry)
        .with_public_base_url(config.public_base_url.clone())
        .with_behind_proxy(config.behind_proxy);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining telemetry");
    if tokio::time::timeout(TELEMETRY_DRAIN_TIMEOUT, worker)
        .await
        .is_err()
    {
        tracing::warn!("Telemetry worker did not finish within {:?}", TELEMETRY_DRAIN_TIMEOUT);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
