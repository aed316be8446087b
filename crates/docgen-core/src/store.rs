//! Database tier abstraction
//!
//! The database is the last lookup tier and the preferred registration
//! target. Concrete backends (PostgreSQL in the server crate, an in-memory
//! map here for tests and database-less runs) implement [`ArtifactDb`].

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Failure modes of a database operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no entry for id '{0}'")]
    NotFound(String),

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

/// Keyed byte storage addressed by artifact identifier
#[async_trait]
pub trait ArtifactDb: Send + Sync {
    /// Insert or replace the payload stored under `id`
    async fn store(&self, id: &str, payload: Vec<u8>) -> Result<(), StoreError>;

    async fn fetch(&self, id: &str) -> Result<Vec<u8>, StoreError>;

    /// Cheap liveness check
    async fn ping(&self) -> Result<(), StoreError>;
}

/// In-process database backed by a map
#[derive(Debug, Default)]
pub struct MemoryDb {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    offline: AtomicBool,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails with `Unavailable` while set
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory database is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactDb for MemoryDb {
    async fn store(&self, id: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries.write().insert(id.to_string(), payload);
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        self.check_online()?;
        self.entries
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}
