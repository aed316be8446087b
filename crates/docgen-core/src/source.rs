//! Byte sources tried in order during named resolution
//!
//! Each tier answers a lookup with [`Lookup::Found`], [`Lookup::Missing`] or
//! [`Lookup::Unavailable`]. The resolver walks an ordered slice of sources
//! and decides what a miss or an outage means based on the tier's position.

use crate::cache::{BoundedCache, CachedBytes};
use crate::path::disk_file_name;
use crate::store::{ArtifactDb, StoreError};
use async_trait::async_trait;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which storage tier answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Cache,
    Disk,
    Database,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Cache => write!(f, "cache"),
            Tier::Disk => write!(f, "disk"),
            Tier::Database => write!(f, "database"),
        }
    }
}

/// Result of asking one tier for an identifier
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(CachedBytes),
    Missing,
    /// The tier could not be consulted at all
    Unavailable(String),
}

#[async_trait]
pub trait ByteSource: Send + Sync {
    fn tier(&self) -> Tier;

    async fn read(&self, id: &str) -> Lookup;
}

/// In-process LRU tier
pub struct CacheSource {
    cache: Arc<BoundedCache>,
}

impl CacheSource {
    pub fn new(cache: Arc<BoundedCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<BoundedCache> {
        &self.cache
    }
}

#[async_trait]
impl ByteSource for CacheSource {
    fn tier(&self) -> Tier {
        Tier::Cache
    }

    async fn read(&self, id: &str) -> Lookup {
        match self.cache.get(id) {
            Some(bytes) => Lookup::Found(bytes),
            None => Lookup::Missing,
        }
    }
}

/// Registered artifacts stored as flat files under a root directory
#[derive(Debug, Clone)]
pub struct DiskSource {
    root: PathBuf,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of an identifier. Callers validate the bare name first;
    /// separators in a delimiter suffix are escaped here.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(disk_file_name(id).as_ref())
    }

    /// Register an artifact on disk, creating the root on first use
    pub async fn write(&self, id: &str, payload: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.path_for(id), payload).await
    }
}

#[async_trait]
impl ByteSource for DiskSource {
    fn tier(&self) -> Tier {
        Tier::Disk
    }

    async fn read(&self, id: &str) -> Lookup {
        let path = self.path_for(id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Lookup::Found(bytes.into()),
            // A missing root directory just means nothing is registered yet
            Err(e) if e.kind() == ErrorKind::NotFound => Lookup::Missing,
            Err(e) => Lookup::Unavailable(format!("{}: {}", path.display(), e)),
        }
    }
}

/// External database tier
#[derive(Clone)]
pub struct DatabaseSource {
    db: Arc<dyn ArtifactDb>,
}

impl DatabaseSource {
    pub fn new(db: Arc<dyn ArtifactDb>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Arc<dyn ArtifactDb> {
        &self.db
    }
}

#[async_trait]
impl ByteSource for DatabaseSource {
    fn tier(&self) -> Tier {
        Tier::Database
    }

    async fn read(&self, id: &str) -> Lookup {
        match self.db.fetch(id).await {
            Ok(bytes) => Lookup::Found(bytes.into()),
            Err(StoreError::NotFound(_)) => Lookup::Missing,
            Err(StoreError::Unavailable(reason)) => Lookup::Unavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDb;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_disk_found_and_missing() {
        let dir = TempDir::new().unwrap();
        let disk = DiskSource::new(dir.path());
        disk.write("hello-world.tex#!!#", b"Hello").await.unwrap();

        assert!(matches!(
            disk.read("hello-world.tex#!!#").await,
            Lookup::Found(ref b) if &**b == b"Hello"
        ));
        assert!(matches!(disk.read("other.tex").await, Lookup::Missing));
    }

    #[tokio::test]
    async fn test_disk_missing_root_is_missing() {
        let dir = TempDir::new().unwrap();
        let disk = DiskSource::new(dir.path().join("not-created"));
        assert!(matches!(disk.read("a").await, Lookup::Missing));
    }

    #[tokio::test]
    async fn test_disk_directory_is_unavailable() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("folder")).unwrap();
        let disk = DiskSource::new(dir.path());
        assert!(matches!(disk.read("folder").await, Lookup::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_database_maps_store_errors() {
        let db = Arc::new(MemoryDb::new());
        db.store("a", b"1".to_vec()).await.unwrap();
        let source = DatabaseSource::new(db.clone());

        assert!(matches!(source.read("a").await, Lookup::Found(_)));
        assert!(matches!(source.read("b").await, Lookup::Missing));

        db.set_offline(true);
        assert!(matches!(source.read("a").await, Lookup::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_cache_source_reads_cache() {
        let cache = Arc::new(BoundedCache::new("template", 1).unwrap());
        cache.put("a", Arc::from(&b"1"[..]));
        let source = CacheSource::new(cache);
        assert!(matches!(source.read("a").await, Lookup::Found(_)));
        assert!(matches!(source.read("b").await, Lookup::Missing));
    }
}
