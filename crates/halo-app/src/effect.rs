//! Effects: immutable descriptions of what should happen next.
//!
//! The reducer returns effects; it never performs them. Presentation effects
//! (`Navigate`, `ShowToast`) are routed by the orchestrator to its UI event
//! channels, `Log` is executed synchronously, `PersistSession` is committed
//! by the orchestrator in intent order, and the async variants go to the
//! effect executor, which starts the named use case and reports the outcome
//! back as an `Internal` intent carrying the same [`RequestId`].

use crate::state::ProfileDraft;
use halo_core::RequestId;
use halo_session::SessionCredential;

/// The logical slot an async effect occupies.
///
/// At most one operation per slot is live at a time; issuing a second
/// operation on an occupied slot supersedes the first (latest-wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpSlot {
    /// Code request, code redemption, and provider-grant redemption.
    Login,
    /// Profile load and save.
    Profile,
    /// Sign-out.
    Session,
}

/// Where the host should navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    /// The login flow.
    Login,
    /// The authenticated landing screen.
    Home,
    /// The profile screen.
    Profile,
    /// One step back in the host's stack.
    Back,
}

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Neutral confirmation.
    Info,
    /// Something the user should fix.
    Warning,
    /// Something went wrong.
    Error,
}

/// One-off message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// User-presentable text.
    pub text: String,
    /// Severity.
    pub level: ToastLevel,
}

impl Toast {
    /// Neutral toast.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: ToastLevel::Info,
        }
    }

    /// Warning toast.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: ToastLevel::Warning,
        }
    }

    /// Error toast.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: ToastLevel::Error,
        }
    }
}

/// Log severity, mirroring the `tracing` levels the executor maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Finest detail.
    Trace,
    /// Development detail.
    Debug,
    /// Notable events.
    Info,
    /// Degraded but handled.
    Warn,
    /// Something failed.
    Error,
}

/// A log line emitted as data so the reducer stays I/O-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Severity.
    pub level: LogLevel,
    /// Message; may contain diagnostics, never shown to users.
    pub message: String,
}

impl LogEvent {
    /// Trace-level event.
    pub fn trace(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Trace,
            message: message.into(),
        }
    }

    /// Debug-level event.
    pub fn debug(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Debug,
            message: message.into(),
        }
    }

    /// Info-level event.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    /// Warn-level event.
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warn,
            message: message.into(),
        }
    }

    /// Error-level event.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
        }
    }
}

/// Something that should happen next, as data.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the host to navigate.
    Navigate(NavigationTarget),
    /// Ask the host to show a one-off message.
    ShowToast(Toast),
    /// Emit a log line.
    Log(LogEvent),
    /// Commit an accepted credential to the session cache.
    ///
    /// Emitted only for a redemption result that passed the stale check, so
    /// the cache write inherits the reducer's latest-wins ordering; a
    /// superseded redemption never reaches the cache at all.
    PersistSession {
        /// The credential to write through.
        credential: SessionCredential,
    },

    /// Request a one-time code for `email`.
    RequestCode {
        /// Correlation id minted by the reducer.
        request: RequestId,
        /// Address the code goes to.
        email: String,
    },
    /// Redeem a one-time code for a session.
    RedeemCode {
        /// Correlation id minted by the reducer.
        request: RequestId,
        /// Address the code was sent to.
        email: String,
        /// The code the user entered.
        code: String,
    },
    /// Redeem an external provider's grant for a session.
    RedeemGrant {
        /// Correlation id minted by the reducer.
        request: RequestId,
        /// Opaque grant from the provider.
        grant: String,
    },
    /// Load the signed-in user's profile.
    LoadProfile {
        /// Correlation id minted by the reducer.
        request: RequestId,
    },
    /// Save a profile draft.
    SaveProfile {
        /// Correlation id minted by the reducer.
        request: RequestId,
        /// What to save.
        draft: ProfileDraft,
    },
    /// Revoke the session remotely and clear it locally.
    SignOut {
        /// Correlation id minted by the reducer.
        request: RequestId,
    },
}

impl Effect {
    /// The slot an async effect occupies; `None` for non-async effects.
    pub fn slot(&self) -> Option<OpSlot> {
        match self {
            Self::RequestCode { .. } | Self::RedeemCode { .. } | Self::RedeemGrant { .. } => {
                Some(OpSlot::Login)
            }
            Self::LoadProfile { .. } | Self::SaveProfile { .. } => Some(OpSlot::Profile),
            Self::SignOut { .. } => Some(OpSlot::Session),
            Self::Navigate(_) | Self::ShowToast(_) | Self::Log(_) | Self::PersistSession { .. } => {
                None
            }
        }
    }

    /// The correlation id, for async effects only.
    pub fn request(&self) -> Option<RequestId> {
        match self {
            Self::RequestCode { request, .. }
            | Self::RedeemCode { request, .. }
            | Self::RedeemGrant { request, .. }
            | Self::LoadProfile { request }
            | Self::SaveProfile { request, .. }
            | Self::SignOut { request } => Some(*request),
            Self::Navigate(_) | Self::ShowToast(_) | Self::Log(_) | Self::PersistSession { .. } => {
                None
            }
        }
    }

    /// Whether the executor starts async work for this effect.
    pub fn is_async(&self) -> bool {
        self.slot().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::SequentialRequestIds;

    #[test]
    fn async_effects_have_slot_and_request() {
        let id = SequentialRequestIds::nth(1);
        let effect = Effect::RedeemCode {
            request: id,
            email: "a@b.co".to_string(),
            code: "123456".to_string(),
        };
        assert_eq!(effect.slot(), Some(OpSlot::Login));
        assert_eq!(effect.request(), Some(id));
        assert!(effect.is_async());

        assert_eq!(Effect::SignOut { request: id }.slot(), Some(OpSlot::Session));
        assert_eq!(
            Effect::LoadProfile { request: id }.slot(),
            Some(OpSlot::Profile)
        );
    }

    #[test]
    fn presentation_and_log_effects_are_not_async() {
        for effect in [
            Effect::Navigate(NavigationTarget::Home),
            Effect::ShowToast(Toast::info("hello")),
            Effect::Log(LogEvent::debug("noted")),
            Effect::PersistSession {
                credential: SessionCredential::new("access-1", "refresh-1").unwrap(),
            },
        ] {
            assert_eq!(effect.slot(), None);
            assert_eq!(effect.request(), None);
            assert!(!effect.is_async());
        }
    }
}
