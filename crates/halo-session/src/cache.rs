//! The process-wide credential cache.

use crate::credential::SessionCredential;
use crate::launch::Launch;
use halo_core::{BlobStoreEffects, StorageError};
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Blob-store key the serialized credential lives under.
pub const CREDENTIAL_KEY: &str = "session.credential";

/// Failures surfaced by [`SessionCache::update`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The durable write failed. The in-memory value was still applied and
    /// stays readable; whether to retry, report, or ignore is the caller's
    /// call.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cache was shut down before or while the write ran. Normal
    /// process lifetime never produces this.
    #[error("session cache is closed")]
    Closed,
}

type ChangeObserver = Arc<dyn Fn(Option<&SessionCredential>) + Send + Sync>;

/// Cache of at most one [`SessionCredential`], backed by a blob store.
///
/// Reads are synchronous and lock the slot only for a clone. The exclusive
/// domain of a write covers the in-memory swap and the change-observer
/// callbacks; persistence runs outside it, so readers on other threads are
/// never blocked on I/O.
///
/// The slot is a `ReentrantMutex` rather than an `RwLock` so that code
/// executing *inside* the exclusive domain — a change observer fired by
/// [`SessionCache::update`] — can still call the read accessors on the same
/// thread without deadlocking. The `RefCell` write borrow is released before
/// observers run, which is what makes those reentrant reads safe.
pub struct SessionCache {
    slot: ReentrantMutex<RefCell<Option<SessionCredential>>>,
    observers: Mutex<Vec<ChangeObserver>>,
    store: Arc<dyn BlobStoreEffects>,
    open: AtomicBool,
}

impl SessionCache {
    /// Open the cache over `store`.
    ///
    /// On a [`Launch::Subsequent`] launch this performs the one-time durable
    /// restore: a stored credential is loaded into memory, an absent one
    /// leaves the cache empty, and an unreadable or invalid blob is logged
    /// and discarded. [`Launch::First`] skips storage entirely.
    pub async fn open(store: Arc<dyn BlobStoreEffects>, launch: Launch) -> Self {
        let cache = Self {
            slot: ReentrantMutex::new(RefCell::new(None)),
            observers: Mutex::new(Vec::new()),
            store,
            open: AtomicBool::new(true),
        };
        if launch == Launch::Subsequent {
            cache.restore().await;
        }
        cache
    }

    /// Access token of the live session, if any.
    pub fn access_token(&self) -> Option<String> {
        let guard = self.slot.lock();
        let token = guard.borrow().as_ref().map(|c| c.access_token().to_string());
        token
    }

    /// Refresh token of the live session, if any.
    pub fn refresh_token(&self) -> Option<String> {
        let guard = self.slot.lock();
        let token = guard
            .borrow()
            .as_ref()
            .map(|c| c.refresh_token().to_string());
        token
    }

    /// The whole credential, if a session is live.
    pub fn credential(&self) -> Option<SessionCredential> {
        self.slot.lock().borrow().clone()
    }

    /// Whether a session is live.
    pub fn is_authenticated(&self) -> bool {
        self.slot.lock().borrow().is_some()
    }

    /// Replace the session credential: memory first, then the durable blob.
    ///
    /// A persistence failure is surfaced but the in-memory value is *not*
    /// rolled back — the session stays usable and the next successful update
    /// heals the blob.
    pub async fn update(&self, credential: SessionCredential) -> Result<(), SessionError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(SessionError::Closed);
        }

        self.set_slot(Some(credential.clone()));

        let bytes = serde_json::to_vec(&credential).map_err(|e| {
            SessionError::Storage(StorageError::WriteFailed(format!("encode credential: {e}")))
        })?;
        self.store.store(CREDENTIAL_KEY, bytes).await?;

        if !self.open.load(Ordering::SeqCst) {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    /// Drop the session from memory and from the durable store.
    ///
    /// Safe to call when nothing is stored. A failure to delete the blob is
    /// logged, not raised; the in-memory clear always wins.
    pub async fn clear(&self) {
        self.set_slot(None);
        if let Err(e) = self.store.remove(CREDENTIAL_KEY).await {
            warn!(error = %e, "failed to remove durable session credential");
        }
    }

    /// Register a change observer.
    ///
    /// Observers run synchronously inside the exclusive domain after every
    /// update or clear, with the new value. They may call the read accessors
    /// freely; they must not block.
    pub fn on_change(&self, observer: impl Fn(Option<&SessionCredential>) + Send + Sync + 'static) {
        self.observers.lock().push(Arc::new(observer));
    }

    /// Refuse further updates. Reads keep working.
    pub fn shutdown(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn set_slot(&self, value: Option<SessionCredential>) {
        let guard = self.slot.lock();
        *guard.borrow_mut() = value.clone();
        // Write borrow released above; observers may re-enter the read
        // accessors on this thread.
        let observers = self.observers.lock().clone();
        for observer in &observers {
            observer(value.as_ref());
        }
        drop(guard);
    }

    async fn restore(&self) {
        let bytes = match self.store.retrieve(CREDENTIAL_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "credential restore failed; starting unauthenticated");
                return;
            }
        };

        match serde_json::from_slice::<SessionCredential>(&bytes) {
            Ok(credential) => match credential.validate() {
                Ok(()) => {
                    debug!("restored durable session credential");
                    self.set_slot(Some(credential));
                }
                Err(e) => {
                    warn!(error = %e, "stored credential is invalid; discarding");
                }
            },
            Err(e) => {
                warn!(error = %e, "stored credential blob is unreadable; discarding");
            }
        }
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("authenticated", &self.is_authenticated())
            .field("open", &self.open.load(Ordering::SeqCst))
            .finish()
    }
}
