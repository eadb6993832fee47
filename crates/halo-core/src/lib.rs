//! Pure contracts for the Halo application core.
//!
//! This crate holds the vocabulary every other layer speaks: correlation
//! identifiers, the use-case failure taxonomy, and the effect traits that
//! handler crates implement. It contains no runtime code and no policy.
//!
//! ```text
//! halo-app ──────► halo-core ◄────── halo-effects
//! (consumes         (contracts)       (implements
//!  contracts)                          handler traits)
//! ```

pub mod effects;
pub mod errors;
pub mod identifiers;

pub use effects::{validate_key, BlobStoreEffects, StorageError};
pub use errors::{DomainFault, SystemFailure, UseCaseError};
pub use identifiers::{RequestId, RequestIdSource, SequentialRequestIds, UuidRequestIds};
