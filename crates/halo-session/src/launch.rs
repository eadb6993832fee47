//! First-launch detection.

use halo_core::BlobStoreEffects;
use tracing::warn;

/// Blob-store key of the has-launched-before marker.
pub const LAUNCH_MARKER_KEY: &str = "launch-marker";

/// Whether this process start is the first ever on this profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// No prior launch recorded; restore is skipped.
    First,
    /// The marker exists; a durable credential may too.
    Subsequent,
}

/// Read the launch marker, writing it on the way out.
///
/// Returns [`Launch::First`] exactly once per store. A probe failure
/// degrades to [`Launch::Subsequent`]: a read hiccup must never make the
/// cache skip a restore and shadow an existing credential.
pub async fn detect_launch(store: &dyn BlobStoreEffects) -> Launch {
    match store.exists(LAUNCH_MARKER_KEY).await {
        Ok(true) => Launch::Subsequent,
        Ok(false) => {
            if let Err(e) = store.store(LAUNCH_MARKER_KEY, b"1".to_vec()).await {
                warn!(error = %e, "could not persist launch marker");
            }
            Launch::First
        }
        Err(e) => {
            warn!(error = %e, "launch probe failed; assuming subsequent launch");
            Launch::Subsequent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use halo_core::StorageError;
    use halo_effects::MemoryBlobStore;

    #[tokio::test]
    async fn first_then_subsequent() {
        let store = MemoryBlobStore::new();
        assert_eq!(detect_launch(&store).await, Launch::First);
        assert_eq!(detect_launch(&store).await, Launch::Subsequent);
        assert_eq!(detect_launch(&store).await, Launch::Subsequent);
    }

    #[tokio::test]
    async fn probe_failure_degrades_to_subsequent() {
        struct BrokenProbe;

        #[async_trait]
        impl BlobStoreEffects for BrokenProbe {
            async fn store(&self, _key: &str, _value: Vec<u8>) -> Result<(), StorageError> {
                Err(StorageError::WriteFailed("offline".to_string()))
            }

            async fn retrieve(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
                Err(StorageError::ReadFailed("offline".to_string()))
            }

            async fn remove(&self, _key: &str) -> Result<(), StorageError> {
                Err(StorageError::DeleteFailed("offline".to_string()))
            }
        }

        assert_eq!(detect_launch(&BrokenProbe).await, Launch::Subsequent);
    }
}
