//! Filesystem snapshot store.
//!
//! One file per snapshot kind under a configurable directory, named by the
//! kind's stable key. Writes go through a temporary file and a rename so a
//! crash mid-write never leaves a torn blob behind; readers see either the
//! old snapshot or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use scholaris_core::defaults::{DEFAULT_CACHE_DIR, ENV_CACHE_DIR};
use scholaris_core::error::{Error, Result};
use scholaris_core::traits::{SnapshotKind, SnapshotStore};

/// Snapshot store over a directory of JSON blob files.
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build a store from `SCHOLARIS_CACHE_DIR`, falling back to the
    /// default directory when unset.
    pub fn from_env() -> Self {
        let dir = std::env::var(ENV_CACHE_DIR).unwrap_or_else(|_| DEFAULT_CACHE_DIR.to_string());
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, kind: SnapshotKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.key()))
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    async fn read(&self, kind: SnapshotKind) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(kind)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Cache(format!(
                "failed to read {} snapshot: {e}",
                kind.key()
            ))),
        }
    }

    async fn write(&self, kind: SnapshotKind, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Cache(format!(
                "failed to create snapshot directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.path_for(kind);
        let tmp = self.dir.join(format!("{}.json.tmp", kind.key()));
        fs::write(&tmp, data).await.map_err(|e| {
            Error::Cache(format!("failed to write {} snapshot: {e}", kind.key()))
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            Error::Cache(format!("failed to commit {} snapshot: {e}", kind.key()))
        })?;

        debug!(
            path = %path.display(),
            bytes = data.len(),
            "snapshot written"
        );
        Ok(())
    }

    async fn delete(&self, kind: SnapshotKind) -> Result<()> {
        match fs::remove_file(self.path_for(kind)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Cache(format!(
                "failed to delete {} snapshot: {e}",
                kind.key()
            ))),
        }
    }

    async fn exists(&self, kind: SnapshotKind) -> Result<bool> {
        match fs::metadata(self.path_for(kind)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Cache(format!(
                "failed to stat {} snapshot: {e}",
                kind.key()
            ))),
        }
    }
}
