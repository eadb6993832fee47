//! Filesystem blob store.
//!
//! One file per key under a base directory. The base directory is created
//! lazily on first write, so constructing a handler never touches the disk.

use async_trait::async_trait;
use halo_core::{validate_key, BlobStoreEffects, StorageError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Durable blob store writing one `{key}.blob` file per key.
#[derive(Debug, Clone)]
pub struct FilesystemBlobStore {
    base_dir: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a handler rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory this handler reads and writes.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.blob"))
    }
}

#[async_trait]
impl BlobStoreEffects for FilesystemBlobStore {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        validate_key(key)?;

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("create base dir: {e}")))?;

        fs::write(self.blob_path(key), value)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("write blob: {e}")))?;

        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;

        match fs::read(self.blob_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("read blob: {e}"))),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        match fs::remove_file(self.blob_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!("remove blob: {e}"))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;

        match fs::try_exists(self.blob_path(key)).await {
            Ok(present) => Ok(present),
            Err(e) => Err(StorageError::ReadFailed(format!("probe blob: {e}"))),
        }
    }
}
