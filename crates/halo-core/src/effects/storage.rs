//! Keyed blob-store effect contract.
//!
//! Values are opaque bytes; keys are flat identifiers with no path
//! structure. Handlers live in `halo-effects`.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by blob-store handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Key was empty or contained path-hostile characters.
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// What the handler objected to.
        reason: String,
    },

    /// Write could not be completed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Read could not be completed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// Delete could not be completed.
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}

/// Asynchronous keyed blob storage.
///
/// `retrieve` distinguishes "absent" (`Ok(None)`) from "unreadable"
/// (`Err(..)`), and `remove` of an absent key succeeds, so callers can treat
/// deletion as idempotent.
#[async_trait]
pub trait BlobStoreEffects: Send + Sync {
    /// Store bytes under a key, replacing any previous value.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Fetch the bytes stored under a key.
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove the value stored under a key. Absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether a value exists under a key.
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.retrieve(key).await?.is_some())
    }
}

/// Key validation shared by handlers.
///
/// Keys must be non-empty, free of path separators, and not a relative path
/// component. Dots inside a key ("session.credential") are fine.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            reason: "empty key".to_string(),
        });
    }
    if key == "." || key == ".." {
        return Err(StorageError::InvalidKey {
            reason: format!("key '{key}' is a path component"),
        });
    }
    if key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey {
            reason: format!("key '{key}' contains a path separator"),
        });
    }
    Ok(())
}
