//! Blob-store handlers implementing the `halo-core` storage contract.
//!
//! Production-grade handlers only; test doubles belong in the test modules
//! of the crates that need them.

pub mod storage;

pub use storage::filesystem::FilesystemBlobStore;
pub use storage::memory::MemoryBlobStore;
