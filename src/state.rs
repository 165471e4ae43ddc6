//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ClickRecorder, LinkRegistry};
use crate::domain::clock::Clock;
use crate::domain::telemetry::Telemetry;
use crate::infrastructure::persistence::InMemoryLinkRepository;

/// Handles to the services behind the HTTP routes. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_registry: Arc<LinkRegistry<InMemoryLinkRepository>>,
    pub click_recorder: Arc<ClickRecorder<InMemoryLinkRepository>>,
    pub telemetry: Telemetry,
    /// Base for generated short links; `None` means derive from `Host`.
    pub public_base_url: Option<String>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for client addresses.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the registry and click recorder around one shared repository.
    pub fn new(
        repository: Arc<InMemoryLinkRepository>,
        clock: Arc<dyn Clock>,
        telemetry: Telemetry,
    ) -> Self {
        let telemetry = telemetry.with_clock(clock.clone());
        let link_registry = Arc::new(LinkRegistry::new(
            repository.clone(),
            clock.clone(),
            telemetry.clone(),
        ));
        let click_recorder = Arc::new(ClickRecorder::new(repository, clock));

        Self {
            link_registry,
            click_recorder,
            telemetry,
            public_base_url: None,
            behind_proxy: false,
        }
    }

    pub fn with_public_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_base_url = base_url.map(|b| b.trim_end_matches('/').to_string());
        self
    }

    pub fn with_behind_proxy(mut self, behind_proxy: bool) -> Self {
        self.behind_proxy = behind_proxy;
        self
    }
}
