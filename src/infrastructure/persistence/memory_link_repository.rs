//! Process-local implementation of link repository.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::domain::entities::{ClickEvent, LinkRecord};
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::LinkRepository;

/// In-memory repository for link records.
///
/// Insert and append take the write lock for the whole check-and-mutate step.
/// Reads clone the record under the read lock. No lock is held across an await.
/// Contents are lost when the process exits.
pub struct InMemoryLinkRepository {
    records: RwLock<HashMap<String, LinkRecord>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord, RepositoryError> {
        let mut records = self.records.write();

        match records.entry(record.code.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict { code: record.code }),
            Entry::Vacant(slot) => Ok(slot.insert(record).clone()),
        }
    }

    async fn find_by_code(&self, code: &str) -> Option<LinkRecord> {
        self.records.read().get(code).cloned()
    }

    async fn append_click(&self, code: &str, click: ClickEvent) -> Result<usize, RepositoryError> {
        let mut records = self.records.write();

        let record = records.get_mut(code).ok_or_else(|| RepositoryError::NotFound {
            code: code.to_string(),
        })?;
        record.clicks.push(click);

        Ok(record.clicks.len())
    }

    async fn count(&self) -> usize {
        self.records.read().len()
    }
}
