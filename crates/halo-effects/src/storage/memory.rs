//! In-memory blob store.
//!
//! Backs ephemeral profiles and most tests. Cheap to clone: clones share the
//! same underlying map.

use async_trait::async_trait;
use halo_core::{validate_key, BlobStoreEffects, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Blob store held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobStoreEffects for MemoryBlobStore {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        validate_key(key)?;
        self.blobs.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        Ok(self.blobs.read().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.blobs.write().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        Ok(self.blobs.read().contains_key(key))
    }
}
