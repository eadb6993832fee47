//! The pure state-transition function.
//!
//! `reduce` is synchronous, deterministic, and free of I/O, clocks, and
//! randomness; the two capabilities it needs — minting correlation ids and
//! resolving failures — come in through [`ReducerEnv`]. The top level
//! dispatches on intent family only; the business logic lives in one
//! sub-module per family.
//!
//! Rules every sub-reducer honors:
//!
//! * **Validation before effect** — input that fails a local check produces
//!   toast/log effects only; no id is minted, no async effect is emitted.
//! * **Superseding** — each newly minted id replaces the slot's recorded
//!   latest request, so at most one id per slot is ever live.
//! * **Stale results** — an `Internal` intent whose id is not the slot's
//!   recorded latest leaves state untouched and yields only a debug log.
//! * **Bounded failure handling** — every failed result goes through the
//!   resolver chain, and the reducer branches only on the resulting
//!   [`crate::resolve::ResolutionAction`], never on raw error payloads.

mod external;
mod internal;
mod lifecycle;
mod user;

use crate::effect::Effect;
use crate::intent::Intent;
use crate::resolve::{Resolution, ResolverChain};
use crate::state::AppState;
use halo_core::{DomainFault, RequestId, RequestIdSource, UseCaseError};
use std::sync::Arc;

/// The reducer's injected capabilities: id minting and error resolution.
pub struct ReducerEnv {
    ids: Arc<dyn RequestIdSource>,
    resolver: Arc<ResolverChain>,
}

impl ReducerEnv {
    /// Build from an id source and a resolver chain.
    pub fn new(ids: Arc<dyn RequestIdSource>, resolver: Arc<ResolverChain>) -> Self {
        Self { ids, resolver }
    }

    /// Mint a fresh correlation id.
    pub fn mint(&self) -> RequestId {
        self.ids.next_request_id()
    }

    /// Resolve a failed use case into one bounded [`Resolution`].
    pub fn resolve<C, B>(&self, error: &UseCaseError<C, B>) -> Resolution
    where
        C: DomainFault,
        B: DomainFault,
    {
        self.resolver.resolve(error)
    }
}

/// Apply one intent to the state, returning the effects to perform.
pub fn reduce(state: &mut AppState, intent: Intent, env: &ReducerEnv) -> Vec<Effect> {
    match intent {
        Intent::Lifecycle(intent) => lifecycle::reduce(state, intent, env),
        Intent::User(intent) => user::reduce(state, intent, env),
        Intent::External(intent) => external::reduce(state, intent, env),
        Intent::Internal(intent) => internal::reduce(state, intent, env),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{NavigationTarget, OpSlot, ToastLevel};
    use crate::intent::{ExternalIntent, InternalIntent, LifecycleIntent, UserIntent};
    use crate::state::{LoginRequirement, Profile, Screen};
    use crate::usecases::{AuthBoundaryError, ProfileBoundaryError, ProfileFailure, RedeemFailure};
    use halo_core::{SequentialRequestIds, SystemFailure};
    use halo_session::SessionCredential;

    fn env() -> ReducerEnv {
        ReducerEnv::new(
            Arc::new(SequentialRequestIds::default()),
            Arc::new(ResolverChain::standard()),
        )
    }

    fn async_effects(effects: &[Effect]) -> Vec<&Effect> {
        effects.iter().filter(|e| e.is_async()).collect()
    }

    fn user(state: &mut AppState, intent: UserIntent, env: &ReducerEnv) -> Vec<Effect> {
        reduce(state, Intent::User(intent), env)
    }

    fn type_email(state: &mut AppState, env: &ReducerEnv, value: &str) {
        let effects = user(
            state,
            UserIntent::EmailEdited {
                value: value.to_string(),
            },
            env,
        );
        assert!(effects.is_empty());
    }

    fn credential() -> SessionCredential {
        SessionCredential::new("access-1", "refresh-1").unwrap()
    }

    #[test]
    fn started_navigates_by_session_presence() {
        let env = env();
        let mut state = AppState::default();
        let effects = reduce(
            &mut state,
            Intent::Lifecycle(LifecycleIntent::Started {
                authenticated: true,
            }),
            &env,
        );
        assert!(state.authenticated);
        assert!(effects.contains(&Effect::Navigate(NavigationTarget::Home)));

        let mut state = AppState::default();
        let effects = reduce(
            &mut state,
            Intent::Lifecycle(LifecycleIntent::Started {
                authenticated: false,
            }),
            &env,
        );
        assert!(effects.contains(&Effect::Navigate(NavigationTarget::Login)));
    }

    #[test]
    fn invalid_email_produces_no_async_effect() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "not-an-email");

        let effects = user(&mut state, UserIntent::EmailSubmitted, &env);
        assert!(async_effects(&effects).is_empty());
        assert_eq!(state.login.latest_request, None);
        assert!(!state.login.is_loading);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::ShowToast(toast) if toast.level == ToastLevel::Warning
        )));
    }

    #[test]
    fn valid_email_mints_one_request() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "a@b.co");

        let effects = user(&mut state, UserIntent::EmailSubmitted, &env);
        let asyncs = async_effects(&effects);
        assert_eq!(asyncs.len(), 1);
        assert_eq!(asyncs[0].slot(), Some(OpSlot::Login));
        assert_eq!(asyncs[0].request(), Some(SequentialRequestIds::nth(0)));
        assert_eq!(state.login.latest_request, Some(SequentialRequestIds::nth(0)));
        assert!(state.login.is_loading);
    }

    #[test]
    fn resubmitting_supersedes_the_live_request() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "a@b.co");

        user(&mut state, UserIntent::EmailSubmitted, &env);
        user(&mut state, UserIntent::EmailSubmitted, &env);
        assert_eq!(state.login.latest_request, Some(SequentialRequestIds::nth(1)));
    }

    #[test]
    fn stale_results_leave_state_untouched() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "a@b.co");
        user(&mut state, UserIntent::EmailSubmitted, &env);
        user(&mut state, UserIntent::EmailSubmitted, &env);
        let before = state.clone();

        // The first (superseded) request answers late.
        let effects = reduce(
            &mut state,
            Intent::Internal(InternalIntent::CodeRequestFinished {
                request: SequentialRequestIds::nth(0),
                result: Ok(()),
            }),
            &env,
        );
        assert_eq!(state, before);
        assert!(async_effects(&effects).is_empty());
        assert!(effects.iter().all(|e| matches!(e, Effect::Log(_))));
    }

    #[test]
    fn happy_login_walks_email_code_home() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "a@b.co");
        user(&mut state, UserIntent::EmailSubmitted, &env);

        reduce(
            &mut state,
            Intent::Internal(InternalIntent::CodeRequestFinished {
                request: SequentialRequestIds::nth(0),
                result: Ok(()),
            }),
            &env,
        );
        assert_eq!(state.login.requirement, LoginRequirement::OtpCode);
        assert!(state.login.code_issued);
        assert!(!state.login.is_loading);

        user(
            &mut state,
            UserIntent::OtpEdited {
                value: "123456".to_string(),
            },
            &env,
        );
        let effects = user(&mut state, UserIntent::OtpSubmitted, &env);
        assert_eq!(async_effects(&effects).len(), 1);

        let effects = reduce(
            &mut state,
            Intent::Internal(InternalIntent::RedeemFinished {
                request: SequentialRequestIds::nth(1),
                result: Ok(credential()),
            }),
            &env,
        );
        assert!(state.authenticated);
        assert_eq!(state.login, Default::default());
        assert!(effects.contains(&Effect::Navigate(NavigationTarget::Home)));
        assert!(effects.contains(&Effect::PersistSession {
            credential: credential(),
        }));
    }

    #[test]
    fn otp_submit_without_an_issued_code_is_local_only() {
        let env = env();
        let mut state = AppState::default();
        user(
            &mut state,
            UserIntent::OtpEdited {
                value: "123456".to_string(),
            },
            &env,
        );

        let effects = user(&mut state, UserIntent::OtpSubmitted, &env);
        assert!(async_effects(&effects).is_empty());
        assert_eq!(state.login.latest_request, None);
    }

    #[test]
    fn rate_limited_failure_lands_in_error_handling() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "a@b.co");
        user(&mut state, UserIntent::EmailSubmitted, &env);

        reduce(
            &mut state,
            Intent::Internal(InternalIntent::CodeRequestFinished {
                request: SequentialRequestIds::nth(0),
                result: Err(SystemFailure::rate_limited(Some(30)).into()),
            }),
            &env,
        );
        assert_eq!(state.login.requirement, LoginRequirement::ErrorHandling);
        assert!(!state.login.is_loading);
        assert!(state.login.error_message.as_deref().unwrap().contains("30"));
        assert_eq!(state.login.latest_request, None);
    }

    #[test]
    fn contract_failure_shows_its_own_wording() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "a@b.co");
        user(&mut state, UserIntent::EmailSubmitted, &env);
        reduce(
            &mut state,
            Intent::Internal(InternalIntent::CodeRequestFinished {
                request: SequentialRequestIds::nth(0),
                result: Ok(()),
            }),
            &env,
        );
        user(
            &mut state,
            UserIntent::OtpEdited {
                value: "000000".to_string(),
            },
            &env,
        );
        user(&mut state, UserIntent::OtpSubmitted, &env);

        reduce(
            &mut state,
            Intent::Internal(InternalIntent::RedeemFinished {
                request: SequentialRequestIds::nth(1),
                result: Err(UseCaseError::Contract(RedeemFailure::CodeMismatch)),
            }),
            &env,
        );
        assert_eq!(
            state.login.error_message.as_deref(),
            Some("That code isn't right. Check it and try again.")
        );
    }

    #[test]
    fn error_dismissal_returns_to_the_right_requirement() {
        let env = env();
        let mut state = AppState::default();
        state.login.requirement = LoginRequirement::ErrorHandling;
        state.login.error_message = Some("boom".to_string());
        state.login.code_issued = true;

        user(&mut state, UserIntent::ErrorDismissed, &env);
        assert_eq!(state.login.requirement, LoginRequirement::OtpCode);
        assert_eq!(state.login.error_message, None);

        state.login.requirement = LoginRequirement::ErrorHandling;
        state.login.code_issued = false;
        user(&mut state, UserIntent::ErrorDismissed, &env);
        assert_eq!(state.login.requirement, LoginRequirement::Email);
    }

    #[test]
    fn profile_screen_appearance_starts_a_load() {
        let env = env();
        let mut state = AppState::default();
        let effects = reduce(
            &mut state,
            Intent::Lifecycle(LifecycleIntent::ScreenAppeared {
                screen: Screen::Profile,
            }),
            &env,
        );
        let asyncs = async_effects(&effects);
        assert_eq!(asyncs.len(), 1);
        assert_eq!(asyncs[0].slot(), Some(OpSlot::Profile));
        assert!(state.profile.is_loading);

        // Leaving abandons the in-flight load; its result is then stale.
        reduce(
            &mut state,
            Intent::Lifecycle(LifecycleIntent::ScreenLeft {
                screen: Screen::Profile,
            }),
            &env,
        );
        assert_eq!(state.profile.latest_request, None);
        let before = state.clone();
        reduce(
            &mut state,
            Intent::Internal(InternalIntent::ProfileLoadFinished {
                request: SequentialRequestIds::nth(0),
                result: Ok(Profile {
                    display_name: "Ada".to_string(),
                    email: "ada@example.org".to_string(),
                }),
            }),
            &env,
        );
        assert_eq!(state, before);
    }

    #[test]
    fn expired_profile_session_navigates_to_login() {
        let env = env();
        let mut state = AppState::default();
        reduce(
            &mut state,
            Intent::Lifecycle(LifecycleIntent::ScreenAppeared {
                screen: Screen::Profile,
            }),
            &env,
        );

        let effects = reduce(
            &mut state,
            Intent::Internal(InternalIntent::ProfileLoadFinished {
                request: SequentialRequestIds::nth(0),
                result: Err(UseCaseError::Contract(ProfileFailure::SessionExpired)),
            }),
            &env,
        );
        assert!(effects.contains(&Effect::Navigate(NavigationTarget::Login)));
        assert!(state.profile.error_message.is_some());
    }

    #[test]
    fn forbidden_profile_is_access_denied_not_support() {
        let env = env();
        let mut state = AppState::default();
        reduce(
            &mut state,
            Intent::Lifecycle(LifecycleIntent::ScreenAppeared {
                screen: Screen::Profile,
            }),
            &env,
        );

        let effects = reduce(
            &mut state,
            Intent::Internal(InternalIntent::ProfileLoadFinished {
                request: SequentialRequestIds::nth(0),
                result: Err(UseCaseError::OutOfContract(ProfileBoundaryError::Forbidden)),
            }),
            &env,
        );
        // Denied, not reauth: no navigation away from the screen.
        assert!(!effects.contains(&Effect::Navigate(NavigationTarget::Login)));
        assert_eq!(
            state.profile.error_message.as_deref(),
            Some("You don't have access to this profile.")
        );
    }

    #[test]
    fn provider_grant_shares_the_login_slot() {
        let env = env();
        let mut state = AppState::default();
        type_email(&mut state, &env, "a@b.co");
        user(&mut state, UserIntent::EmailSubmitted, &env);

        let effects = reduce(
            &mut state,
            Intent::External(ExternalIntent::ProviderGrantReceived {
                grant: "grant-1".to_string(),
            }),
            &env,
        );
        let asyncs = async_effects(&effects);
        assert_eq!(asyncs[0].slot(), Some(OpSlot::Login));
        // The grant redemption superseded the code request.
        assert_eq!(state.login.latest_request, Some(SequentialRequestIds::nth(1)));
    }

    #[test]
    fn provider_login_failure_stays_local() {
        let env = env();
        let mut state = AppState::default();
        let effects = reduce(
            &mut state,
            Intent::External(ExternalIntent::ProviderLoginFailed {
                reason: "user cancelled the flow".to_string(),
            }),
            &env,
        );
        assert!(async_effects(&effects).is_empty());
        assert_eq!(state.login.requirement, LoginRequirement::ErrorHandling);
        // The provider's raw reason is diagnostic, never the message.
        assert!(!state
            .login
            .error_message
            .as_deref()
            .unwrap()
            .contains("cancelled the flow"));
    }

    #[test]
    fn sign_out_completes_locally_even_on_remote_failure() {
        let env = env();
        let mut state = AppState {
            authenticated: true,
            ..Default::default()
        };
        let effects = user(&mut state, UserIntent::SignOutRequested, &env);
        assert_eq!(async_effects(&effects)[0].slot(), Some(OpSlot::Session));
        assert_eq!(state.sign_out_request, Some(SequentialRequestIds::nth(0)));

        let effects = reduce(
            &mut state,
            Intent::Internal(InternalIntent::SignOutFinished {
                request: SequentialRequestIds::nth(0),
                result: Err(UseCaseError::OutOfContract(
                    AuthBoundaryError::EmailRejected,
                )),
            }),
            &env,
        );
        assert!(!state.authenticated);
        assert_eq!(state.sign_out_request, None);
        assert!(effects.contains(&Effect::Navigate(NavigationTarget::Login)));
    }

    #[test]
    fn invalid_display_name_never_reaches_the_network() {
        let env = env();
        let mut state = AppState::default();
        user(
            &mut state,
            UserIntent::DisplayNameEdited {
                value: "x".to_string(),
            },
            &env,
        );

        let effects = user(&mut state, UserIntent::ProfileSubmitted, &env);
        assert!(async_effects(&effects).is_empty());
        assert_eq!(state.profile.latest_request, None);
    }

    #[test]
    fn saved_profile_updates_state_and_toasts() {
        let env = env();
        let mut state = AppState::default();
        user(
            &mut state,
            UserIntent::DisplayNameEdited {
                value: "Ada Lovelace".to_string(),
            },
            &env,
        );
        user(&mut state, UserIntent::ProfileSubmitted, &env);

        let effects = reduce(
            &mut state,
            Intent::Internal(InternalIntent::ProfileSaveFinished {
                request: SequentialRequestIds::nth(0),
                result: Ok(Profile {
                    display_name: "Ada Lovelace".to_string(),
                    email: "ada@example.org".to_string(),
                }),
            }),
            &env,
        );
        assert_eq!(
            state.profile.profile.as_ref().unwrap().display_name,
            "Ada Lovelace"
        );
        assert!(!state.profile.is_loading);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::ShowToast(toast) if toast.level == ToastLevel::Info
        )));
    }
}
