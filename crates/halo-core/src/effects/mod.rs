//! Effect contracts implemented by handler crates.

pub mod storage;

pub use storage::{validate_key, BlobStoreEffects, StorageError};
