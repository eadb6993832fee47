//! Intents: immutable descriptions of things that happened.
//!
//! Everything the core reacts to arrives as an [`Intent`] through one entry
//! point. Intents are partitioned into four disjoint families so the reducer
//! can dispatch on provenance before it dispatches on meaning:
//!
//! ```text
//! Lifecycle   the host told us about the view (appeared, left, started)
//! User        the person did something (typed, tapped)
//! External    a platform callback fired (provider SDK login)
//! Internal    the effect executor finished an async operation
//! ```
//!
//! Only `Internal` intents carry a [`RequestId`]; it is always the id the
//! reducer minted when it emitted the originating effect, copied through the
//! executor untouched.

use crate::state::{Profile, Screen};
use crate::usecases::{
    AuthBoundaryError, ProfileBoundaryError, ProfileFailure, RedeemFailure, RequestCodeFailure,
    SignOutFailure,
};
use halo_core::{RequestId, UseCaseError};
use halo_session::SessionCredential;

/// Which of the four families an intent belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentFamily {
    /// View lifecycle notifications from the host.
    Lifecycle,
    /// Direct user input.
    User,
    /// Platform callbacks from outside the core.
    External,
    /// Async results reported by the effect executor.
    Internal,
}

/// View lifecycle notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleIntent {
    /// The application core was started.
    Started {
        /// Whether a restored session already exists.
        authenticated: bool,
    },
    /// A screen became visible.
    ScreenAppeared {
        /// Which screen.
        screen: Screen,
    },
    /// A screen was navigated away from.
    ScreenLeft {
        /// Which screen.
        screen: Screen,
    },
}

/// Direct user input.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    /// The email field changed.
    EmailEdited {
        /// New field contents.
        value: String,
    },
    /// The one-time-code field changed.
    OtpEdited {
        /// New field contents.
        value: String,
    },
    /// The user submitted the email form.
    EmailSubmitted,
    /// The user submitted the one-time code.
    OtpSubmitted,
    /// The user dismissed the error affordance.
    ErrorDismissed,
    /// The display-name field changed.
    DisplayNameEdited {
        /// New field contents.
        value: String,
    },
    /// The user submitted the profile form.
    ProfileSubmitted,
    /// The user asked to sign out.
    SignOutRequested,
}

/// Platform callbacks arriving from outside the core.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalIntent {
    /// An external identity provider completed login and handed us a grant.
    ProviderGrantReceived {
        /// Opaque grant to redeem for a session.
        grant: String,
    },
    /// The external provider's login flow failed before producing a grant.
    ProviderLoginFailed {
        /// Provider-supplied reason; diagnostic only, never shown verbatim.
        reason: String,
    },
}

/// Async results reported by the effect executor.
///
/// Every variant carries the [`RequestId`] of the effect that started the
/// operation; the reducer drops results whose id no longer matches the slot's
/// recorded latest request.
#[derive(Debug, Clone, PartialEq)]
pub enum InternalIntent {
    /// A one-time-code request finished.
    CodeRequestFinished {
        /// Correlation id from the originating effect.
        request: RequestId,
        /// Outcome of the operation.
        result: Result<(), UseCaseError<RequestCodeFailure, AuthBoundaryError>>,
    },
    /// A code or provider-grant redemption finished.
    RedeemFinished {
        /// Correlation id from the originating effect.
        request: RequestId,
        /// The validated credential on success; the reducer decides whether
        /// it is accepted and persisted.
        result: Result<SessionCredential, UseCaseError<RedeemFailure, AuthBoundaryError>>,
    },
    /// A profile load finished.
    ProfileLoadFinished {
        /// Correlation id from the originating effect.
        request: RequestId,
        /// The loaded profile on success.
        result: Result<Profile, UseCaseError<ProfileFailure, ProfileBoundaryError>>,
    },
    /// A profile save finished.
    ProfileSaveFinished {
        /// Correlation id from the originating effect.
        request: RequestId,
        /// The saved profile as the boundary echoed it back.
        result: Result<Profile, UseCaseError<ProfileFailure, ProfileBoundaryError>>,
    },
    /// A sign-out finished.
    SignOutFinished {
        /// Correlation id from the originating effect.
        request: RequestId,
        /// Outcome of the remote revoke; local sign-out completes regardless.
        result: Result<(), UseCaseError<SignOutFailure, AuthBoundaryError>>,
    },
}

impl InternalIntent {
    /// The correlation id this result answers.
    pub fn request(&self) -> RequestId {
        match self {
            Self::CodeRequestFinished { request, .. }
            | Self::RedeemFinished { request, .. }
            | Self::ProfileLoadFinished { request, .. }
            | Self::ProfileSaveFinished { request, .. }
            | Self::SignOutFinished { request, .. } => *request,
        }
    }
}

/// Something that happened, as data.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// View lifecycle notification.
    Lifecycle(LifecycleIntent),
    /// Direct user input.
    User(UserIntent),
    /// Platform callback.
    External(ExternalIntent),
    /// Async result from the executor.
    Internal(InternalIntent),
}

impl Intent {
    /// Which family this intent belongs to.
    pub fn family(&self) -> IntentFamily {
        match self {
            Self::Lifecycle(_) => IntentFamily::Lifecycle,
            Self::User(_) => IntentFamily::User,
            Self::External(_) => IntentFamily::External,
            Self::Internal(_) => IntentFamily::Internal,
        }
    }

    /// The correlation id, for `Internal` intents only.
    pub fn request(&self) -> Option<RequestId> {
        match self {
            Self::Internal(internal) => Some(internal.request()),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Lifecycle(LifecycleIntent::Started { .. }) => "started",
            Self::Lifecycle(LifecycleIntent::ScreenAppeared { .. }) => "screen-appeared",
            Self::Lifecycle(LifecycleIntent::ScreenLeft { .. }) => "screen-left",
            Self::User(UserIntent::EmailEdited { .. }) => "email-edited",
            Self::User(UserIntent::OtpEdited { .. }) => "otp-edited",
            Self::User(UserIntent::EmailSubmitted) => "email-submitted",
            Self::User(UserIntent::OtpSubmitted) => "otp-submitted",
            Self::User(UserIntent::ErrorDismissed) => "error-dismissed",
            Self::User(UserIntent::DisplayNameEdited { .. }) => "display-name-edited",
            Self::User(UserIntent::ProfileSubmitted) => "profile-submitted",
            Self::User(UserIntent::SignOutRequested) => "sign-out-requested",
            Self::External(ExternalIntent::ProviderGrantReceived { .. }) => {
                "provider-grant-received"
            }
            Self::External(ExternalIntent::ProviderLoginFailed { .. }) => "provider-login-failed",
            Self::Internal(InternalIntent::CodeRequestFinished { .. }) => "code-request-finished",
            Self::Internal(InternalIntent::RedeemFinished { .. }) => "redeem-finished",
            Self::Internal(InternalIntent::ProfileLoadFinished { .. }) => "profile-load-finished",
            Self::Internal(InternalIntent::ProfileSaveFinished { .. }) => "profile-save-finished",
            Self::Internal(InternalIntent::SignOutFinished { .. }) => "sign-out-finished",
        }
    }
}
