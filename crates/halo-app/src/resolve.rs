//! The error-resolution pipeline.
//!
//! Every failed use case ends here, and every failure comes out as exactly
//! one [`Resolution`] — the reducer renders that bounded vocabulary and
//! nothing else, so no raw error ever reaches the UI. Feature-scoped
//! resolvers are consulted in order and may decline; a built-in default
//! covers whatever they leave, which is what makes the pipeline total.

use crate::usecases::{ProfileBoundaryError, ProfileFailure};
use halo_core::{DomainFault, SystemFailure, UseCaseError};
use std::sync::Arc;

/// How a renewed sign-in should be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReauthMode {
    /// Send the user through the visible login flow.
    Interactive,
    /// Refresh behind the scenes; fall back to interactive on failure.
    Silent,
}

/// The closed set of user-facing failure actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionAction {
    /// Tell the user what happened; nothing else to do.
    Inform,
    /// Worth trying the same operation again.
    Retry,
    /// Back off before retrying.
    Cooldown {
        /// Server-provided wait, if it gave one.
        retry_after_secs: Option<u64>,
    },
    /// This app version can no longer talk to the service.
    UpdateApp,
    /// Escalate to a human.
    ContactSupport,
    /// Obtain a fresh session first.
    Reauth {
        /// How to obtain it.
        mode: ReauthMode,
    },
    /// The user is not allowed to do this; retrying will not help.
    AccessDenied,
}

/// One resolved failure: an action, a user-presentable message, and an
/// optional diagnostic that must never be shown to end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// What the UI should offer.
    pub action: ResolutionAction,
    /// Text safe to put on screen.
    pub message: String,
    /// Detail for logs and support tickets only.
    pub diagnostic: Option<String>,
}

impl Resolution {
    fn new(action: ResolutionAction, message: impl Into<String>) -> Self {
        Self {
            action,
            message: message.into(),
            diagnostic: None,
        }
    }

    /// An [`ResolutionAction::Inform`] resolution.
    pub fn inform(message: impl Into<String>) -> Self {
        Self::new(ResolutionAction::Inform, message)
    }

    /// A [`ResolutionAction::Retry`] resolution.
    pub fn retry(message: impl Into<String>) -> Self {
        Self::new(ResolutionAction::Retry, message)
    }

    /// A [`ResolutionAction::Cooldown`] resolution.
    pub fn cooldown(retry_after_secs: Option<u64>, message: impl Into<String>) -> Self {
        Self::new(ResolutionAction::Cooldown { retry_after_secs }, message)
    }

    /// An [`ResolutionAction::UpdateApp`] resolution.
    pub fn update_app(message: impl Into<String>) -> Self {
        Self::new(ResolutionAction::UpdateApp, message)
    }

    /// A [`ResolutionAction::ContactSupport`] resolution.
    pub fn contact_support(message: impl Into<String>) -> Self {
        Self::new(ResolutionAction::ContactSupport, message)
    }

    /// A [`ResolutionAction::Reauth`] resolution.
    pub fn reauth(mode: ReauthMode, message: impl Into<String>) -> Self {
        Self::new(ResolutionAction::Reauth { mode }, message)
    }

    /// An [`ResolutionAction::AccessDenied`] resolution.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ResolutionAction::AccessDenied, message)
    }

    /// Attach a diagnostic string.
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }
}

/// Type-erased view of a [`UseCaseError`], so one resolver chain serves
/// every use case regardless of its concrete error parameters.
#[derive(Clone, Copy)]
pub enum FaultView<'a> {
    /// Anticipated domain rejection.
    Contract(&'a dyn DomainFault),
    /// Recognized but unanticipated boundary failure.
    OutOfContract(&'a dyn DomainFault),
    /// Infrastructure-level failure.
    System(&'a SystemFailure),
}

impl<'a> FaultView<'a> {
    /// Erase a concrete use-case error.
    pub fn of<C, B>(error: &'a UseCaseError<C, B>) -> Self
    where
        C: DomainFault,
        B: DomainFault,
    {
        match error {
            UseCaseError::Contract(c) => Self::Contract(c),
            UseCaseError::OutOfContract(b) => Self::OutOfContract(b),
            UseCaseError::System(s) => Self::System(s),
        }
    }

    /// The contract fault downcast to `T`, if both match.
    pub fn contract_as<T: DomainFault>(&self) -> Option<&'a T> {
        match self {
            Self::Contract(fault) => fault.as_any().downcast_ref(),
            _ => None,
        }
    }

    /// The out-of-contract fault downcast to `T`, if both match.
    pub fn out_of_contract_as<T: DomainFault>(&self) -> Option<&'a T> {
        match self {
            Self::OutOfContract(fault) => fault.as_any().downcast_ref(),
            _ => None,
        }
    }

    /// The system failure, if that is what this is.
    pub fn system(&self) -> Option<&'a SystemFailure> {
        match self {
            Self::System(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A feature-scoped resolver. Returning `None` passes the fault along the
/// chain; the built-in default resolver is the backstop.
pub trait ResolveFault: Send + Sync {
    /// Resolve the fault, or decline.
    fn resolve(&self, fault: &FaultView<'_>) -> Option<Resolution>;
}

impl<F> ResolveFault for F
where
    F: Fn(&FaultView<'_>) -> Option<Resolution> + Send + Sync,
{
    fn resolve(&self, fault: &FaultView<'_>) -> Option<Resolution> {
        self(fault)
    }
}

/// Fallback wording when a contract fault carries no message of its own.
const FALLBACK_INFORM: &str = "Something went wrong. Please try again.";
const FALLBACK_ESCALATE: &str =
    "Something unexpected went wrong. Contact support if it keeps happening.";
const RETRY_MESSAGE: &str = "We couldn't reach the service. Check your connection and try again.";
const UPDATE_MESSAGE: &str = "This version of the app is out of date. Please update it.";

fn default_resolution(fault: &FaultView<'_>) -> Resolution {
    match fault {
        FaultView::Contract(c) => {
            Resolution::inform(c.user_message().unwrap_or(FALLBACK_INFORM))
        }
        // Real but unanticipated here; be conservative and keep the raw
        // description out of the message.
        FaultView::OutOfContract(b) => match b.user_message() {
            Some(message) => Resolution::contact_support(message).with_diagnostic(b.to_string()),
            None => Resolution::contact_support(FALLBACK_ESCALATE).with_diagnostic(b.to_string()),
        },
        FaultView::System(failure) => match failure {
            SystemFailure::RateLimited {
                retry_after_secs: Some(secs),
            } => Resolution::cooldown(
                Some(*secs),
                format!("Too many attempts. Try again in {secs} seconds."),
            ),
            SystemFailure::RateLimited {
                retry_after_secs: None,
            } => Resolution::cooldown(None, "Too many attempts. Try again in a little while."),
            SystemFailure::Unavailable { detail } => {
                Resolution::retry(RETRY_MESSAGE).with_diagnostic(detail.clone())
            }
            SystemFailure::ContractViolation { detail } => {
                Resolution::update_app(UPDATE_MESSAGE).with_diagnostic(detail.clone())
            }
            SystemFailure::InvariantViolation { reason } => {
                Resolution::contact_support(FALLBACK_ESCALATE).with_diagnostic(reason.clone())
            }
            SystemFailure::Unknown { detail } => {
                Resolution::contact_support(FALLBACK_ESCALATE).with_diagnostic(detail.clone())
            }
        },
    }
}

/// Profile-feature resolver: expired sessions re-authenticate instead of
/// informing, and a forbidden answer is a dead end, not a support case.
fn profile_feature_resolver(fault: &FaultView<'_>) -> Option<Resolution> {
    if let Some(ProfileFailure::SessionExpired) = fault.contract_as::<ProfileFailure>() {
        return Some(Resolution::reauth(
            ReauthMode::Interactive,
            "Your session has expired. Sign in again.",
        ));
    }
    if let Some(ProfileBoundaryError::Forbidden) =
        fault.out_of_contract_as::<ProfileBoundaryError>()
    {
        return Some(Resolution::access_denied(
            "You don't have access to this profile.",
        ));
    }
    None
}

/// Ordered resolver chain ending in the built-in default.
///
/// `resolve` is total: some resolver always answers, and none of them panic.
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn ResolveFault>>,
}

impl ResolverChain {
    /// A chain with no feature resolvers; everything hits the default.
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// The chain production wires: feature resolvers shipped with the app.
    pub fn standard() -> Self {
        Self::new().with_resolver(Arc::new(profile_feature_resolver))
    }

    /// Append a resolver, consulted after those already present.
    pub fn with_resolver(mut self, resolver: Arc<dyn ResolveFault>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Insert a resolver ahead of those already present.
    pub fn prepend_resolver(&mut self, resolver: Arc<dyn ResolveFault>) {
        self.resolvers.insert(0, resolver);
    }

    /// Resolve a use-case error into exactly one [`Resolution`].
    pub fn resolve<C, B>(&self, error: &UseCaseError<C, B>) -> Resolution
    where
        C: DomainFault,
        B: DomainFault,
    {
        let fault = FaultView::of(error);
        for resolver in &self.resolvers {
            if let Some(resolution) = resolver.resolve(&fault) {
                return resolution;
            }
        }
        default_resolution(&fault)
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}
