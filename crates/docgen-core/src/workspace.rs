//! Per-request working directories
//!
//! Every request stages its compiler inputs in a fresh directory created
//! under the configured work dir. The directory is addressed only through the
//! absolute path held by its [`Workspace`]; the process working directory is
//! never changed. Dropping a workspace removes it, and
//! [`Workspace::release`] does the same while reporting failures.

use crate::error::{DocgenError, Result};
use crate::path::validate_artifact_name;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PREFIX: &str = "docgen-";

/// Allocates workspaces under one base directory
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    base: PathBuf,
}

impl WorkspaceManager {
    /// `base` is made absolute so later joins never depend on the process cwd
    pub fn new(base: impl AsRef<Path>) -> Result<Self> {
        let base = std::path::absolute(base.as_ref())?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Create a uniquely named empty directory owned by the caller
    pub async fn acquire(&self) -> Result<Workspace> {
        let base = self.base.clone();
        let dir = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&base)?;
            tempfile::Builder::new().prefix(PREFIX).tempdir_in(&base)
        })
        .await
        .map_err(|e| DocgenError::Generic(format!("workspace allocation task failed: {}", e)))??;

        tracing::debug!(path = %dir.path().display(), "workspace acquired");
        Ok(Workspace { dir: Some(dir) })
    }
}

/// Exclusive staging directory of one request
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
}

impl Workspace {
    /// Absolute path of the directory
    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            // Only reachable after release, which consumes self
            None => Path::new(""),
        }
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Write the rendered template under `file_name`
    pub async fn write_rendered(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.write(file_name, bytes).await
    }

    /// Write one resource file. Names must be a single path component.
    pub async fn write_resource(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.write(name, bytes).await
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        validate_artifact_name(name).map_err(|e| {
            DocgenError::MalformedInput(format!("invalid workspace file name: {}", e))
        })?;
        let path = self.file(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Read a file produced inside the workspace
    pub async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.file(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Recursively delete the directory
    pub async fn release(mut self) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        let path = dir.path().to_path_buf();
        tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(|e| DocgenError::Generic(format!("workspace release task failed: {}", e)))??;
        tracing::debug!(path = %path.display(), "workspace released");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        // Cancelled requests land here on a runtime worker; removal goes to
        // the blocking pool when there is one
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_dir(dir));
            }
            Err(_) => remove_dir(dir),
        }
    }
}

fn remove_dir(dir: TempDir) {
    let path = dir.path().to_path_buf();
    match dir.close() {
        Ok(()) => tracing::debug!(path = %path.display(), "workspace removed on drop"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove workspace"),
    }
}
