//! Visit recording for resolved links.

use std::sync::Arc;

use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::entities::{ClickEvent, LinkRecord};
use crate::domain::errors::{RepositoryError, ResolveError};
use crate::domain::repositories::LinkRepository;

/// Appends click events to link histories.
///
/// Only call [`Self::record`] after a successful
/// [`super::LinkRegistry::resolve`]; stats lookups never record visits.
pub struct ClickRecorder<R: LinkRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: LinkRepository> ClickRecorder<R> {
    /// Creates a new click recorder.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Builds a click event stamped with the current time.
    pub fn capture(&self, referrer: Option<&str>, source_address: Option<String>) -> ClickEvent {
        ClickEvent::new(self.clock.now(), referrer, source_address)
    }

    /// Appends `event` to the record's history and returns the new total.
    ///
    /// The append is atomic with respect to concurrent appends and reads.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if the record is not held by the registry.
    pub async fn record(&self, record: &LinkRecord, event: ClickEvent) -> Result<usize, ResolveError> {
        let total = self
            .repository
            .append_click(&record.code, event)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound { code } | RepositoryError::Conflict { code } => {
                    ResolveError::NotFound { code }
                }
            })?;

        debug!(code = %record.code, total, "Click recorded");
        metrics::counter!("clicks_recorded_total").increment(1);

        Ok(total)
    }
}
