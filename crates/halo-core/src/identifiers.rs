//! Correlation identifiers for asynchronous operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Correlation token for one in-flight asynchronous operation.
///
/// A `RequestId` is minted exactly once, by a [`RequestIdSource`] owned by
/// the reducer environment, at the moment an async effect is emitted.
/// Everything downstream (effect payloads, executor bookkeeping, result
/// intents) only ever copies the token; in particular the effect executor
/// never constructs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request-{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Handle both raw UUIDs and prefixed format
        let uuid_str = s.strip_prefix("request-").unwrap_or(s);
        Ok(RequestId(Uuid::parse_str(uuid_str)?))
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Source of fresh [`RequestId`]s.
///
/// Minting goes through a trait so production code gets random tokens while
/// tests substitute a deterministic sequence and can predict the ids a
/// reducer will hand out.
pub trait RequestIdSource: Send + Sync {
    /// Mint a token that no other live operation shares.
    fn next_request_id(&self) -> RequestId;
}

/// Production source backed by random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidRequestIds;

impl RequestIdSource for UuidRequestIds {
    fn next_request_id(&self) -> RequestId {
        RequestId(Uuid::new_v4())
    }
}

/// Deterministic source for tests: a counter folded into the UUID bytes.
#[derive(Debug, Default)]
pub struct SequentialRequestIds(AtomicU64);

impl SequentialRequestIds {
    /// Start counting from `first`.
    pub fn starting_at(first: u64) -> Self {
        Self(AtomicU64::new(first))
    }

    /// The id the counter would mint for `n` without advancing anything.
    pub fn nth(n: u64) -> RequestId {
        let mut bytes = [0u8; 16];
        bytes[8..].copy_from_slice(&n.to_be_bytes());
        RequestId(Uuid::from_bytes(bytes))
    }
}

impl RequestIdSource for SequentialRequestIds {
    fn next_request_id(&self) -> RequestId {
        let n = self.0.fetch_add(1, Ordering::Relaxed);
        Self::nth(n)
    }
}
