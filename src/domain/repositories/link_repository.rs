//! Repository trait for link record storage.

use crate::domain::entities::{ClickEvent, LinkRecord};
use crate::domain::errors::RepositoryError;
use async_trait::async_trait;

/// Storage for link records keyed by short code.
///
/// Every method is a single atomic unit: `insert` is check-then-insert and
/// `append_click` is read-then-append, so concurrent callers never lose an
/// update and readers never observe a partially appended click list.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_memory.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Stores a new record unless its code is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if any record, live or expired,
    /// already uses the code. Nothing is stored in that case.
    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord, RepositoryError>;

    /// Returns a snapshot of the record stored under `code`.
    ///
    /// `code` is matched exactly; callers normalize case first.
    async fn find_by_code(&self, code: &str) -> Option<LinkRecord>;

    /// Appends a click to the record's history and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no record uses the code.
    async fn append_click(&self, code: &str, click: ClickEvent) -> Result<usize, RepositoryError>;

    /// Number of stored records, expired ones included.
    async fn count(&self) -> usize;
}
