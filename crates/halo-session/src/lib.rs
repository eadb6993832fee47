//! Session credential cache.
//!
//! Holds at most one [`SessionCredential`] for the whole process, readable
//! synchronously from any thread (including from inside the cache's own
//! change notifications) and persisted through the `halo-core` blob-store
//! contract.
//!
//! ```text
//! use cases ──update/clear──► SessionCache ──serde_json──► BlobStoreEffects
//! any thread ──access_token──►    (memory slot, reentrant lock)
//! ```

mod cache;
mod credential;
mod launch;

pub use cache::{SessionCache, SessionError, CREDENTIAL_KEY};
pub use credential::{CredentialError, SessionCredential};
pub use launch::{detect_launch, Launch, LAUNCH_MARKER_KEY};
