#![allow(dead_code)]

use axum::extract::ConnectInfo;
use chrono::{DateTime, TimeZone, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;
use ttl_shortener::domain::clock::ManualClock;
use ttl_shortener::domain::telemetry::{LogEntry, Telemetry};
use ttl_shortener::infrastructure::persistence::InMemoryLinkRepository;
use ttl_shortener::state::AppState;

/// Peer address injected by [`MockConnectInfoLayer`].
pub const PEER_ADDR: &str = "127.0.0.1:12345";

/// Everything a handler test needs: the state, its clock, and the telemetry queue.
pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub telemetry_rx: mpsc::Receiver<LogEntry>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn create_test_state() -> TestContext {
    let clock = Arc::new(ManualClock::new(start_time()));
    let (telemetry, telemetry_rx) = Telemetry::channel(64);
    let state = AppState::new(
        Arc::new(InMemoryLinkRepository::new()),
        clock.clone(),
        telemetry,
    )
    .with_public_base_url(Some("http://sho.rt".to_string()));

    TestContext {
        state,
        clock,
        telemetry_rx,
    }
}

/// Drains every queued telemetry entry.
pub fn drain(rx: &mut mpsc::Receiver<LogEntry>) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    while let Ok(entry) = rx.try_recv() {
        entries.push(entry);
    }
    entries
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
