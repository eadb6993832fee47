//! Internal intents: async results reported by the effect executor.
//!
//! Every handler first checks the result's id against the slot's recorded
//! latest request; a mismatch means the operation was superseded or
//! abandoned, and the result is dropped with a debug log. Failures are
//! resolved through the chain and rendered from the bounded
//! [`ResolutionAction`] vocabulary only.

use super::ReducerEnv;
use crate::effect::{Effect, LogEvent, NavigationTarget, Toast};
use crate::intent::InternalIntent;
use crate::resolve::{Resolution, ResolutionAction};
use crate::state::{AppState, LoginRequirement, ProfileState};
use halo_core::RequestId;

pub(super) fn reduce(
    state: &mut AppState,
    intent: InternalIntent,
    env: &ReducerEnv,
) -> Vec<Effect> {
    match intent {
        InternalIntent::CodeRequestFinished { request, result } => {
            if state.login.latest_request != Some(request) {
                return stale("code request", request);
            }
            state.login.latest_request = None;
            state.login.is_loading = false;
            match result {
                Ok(()) => {
                    state.login.code_issued = true;
                    state.login.requirement = LoginRequirement::OtpCode;
                    vec![
                        Effect::ShowToast(Toast::info("We emailed you a sign-in code.")),
                        Effect::Log(LogEvent::debug("login code issued")),
                    ]
                }
                Err(error) => fail_login(state, env.resolve(&error)),
            }
        }

        InternalIntent::RedeemFinished { request, result } => {
            if state.login.latest_request != Some(request) {
                return stale("redemption", request);
            }
            state.login.latest_request = None;
            state.login.is_loading = false;
            match result {
                // Only a result that survived the stale check gets to touch
                // the session cache: the persist effect is emitted here, so a
                // superseded redemption can never overwrite the winner.
                Ok(credential) => {
                    state.authenticated = true;
                    state.login.reset();
                    vec![
                        Effect::PersistSession { credential },
                        Effect::Navigate(NavigationTarget::Home),
                        Effect::Log(LogEvent::info("signed in")),
                    ]
                }
                Err(error) => fail_login(state, env.resolve(&error)),
            }
        }

        InternalIntent::ProfileLoadFinished { request, result } => {
            if state.profile.latest_request != Some(request) {
                return stale("profile load", request);
            }
            state.profile.latest_request = None;
            state.profile.is_loading = false;
            match result {
                Ok(profile) => {
                    state.profile.display_name_draft = profile.display_name.clone();
                    state.profile.profile = Some(profile);
                    vec![Effect::Log(LogEvent::debug("profile loaded"))]
                }
                Err(error) => fail_profile(state, env.resolve(&error)),
            }
        }

        InternalIntent::ProfileSaveFinished { request, result } => {
            if state.profile.latest_request != Some(request) {
                return stale("profile save", request);
            }
            state.profile.latest_request = None;
            state.profile.is_loading = false;
            match result {
                Ok(profile) => {
                    state.profile.display_name_draft = profile.display_name.clone();
                    state.profile.profile = Some(profile);
                    vec![
                        Effect::ShowToast(Toast::info("Profile saved.")),
                        Effect::Log(LogEvent::debug("profile saved")),
                    ]
                }
                Err(error) => fail_profile(state, env.resolve(&error)),
            }
        }

        InternalIntent::SignOutFinished { request, result } => {
            if state.sign_out_request != Some(request) {
                return stale("sign-out", request);
            }
            state.sign_out_request = None;
            // Local sign-out completes whatever the remote revoke said; the
            // use case has already cleared the session cache.
            let mut effects = complete_sign_out(state);
            if let Err(error) = result {
                let resolution = env.resolve(&error);
                effects.push(Effect::Log(LogEvent::warn(describe_failure(
                    "remote revoke",
                    &resolution,
                ))));
            }
            effects
        }
    }
}

fn stale(operation: &str, request: RequestId) -> Vec<Effect> {
    vec![Effect::Log(LogEvent::debug(format!(
        "dropping stale {operation} result ({request})"
    )))]
}

fn describe_failure(what: &str, resolution: &Resolution) -> String {
    match &resolution.diagnostic {
        Some(diagnostic) => format!("{what} failed: {} [{diagnostic}]", resolution.message),
        None => format!("{what} failed: {}", resolution.message),
    }
}

/// Shared failure rendering: record the message, log, and follow the one
/// action that implies navigation.
fn failure_effects(feature: &str, resolution: &Resolution) -> Vec<Effect> {
    let mut effects = vec![Effect::Log(LogEvent::warn(describe_failure(
        feature, resolution,
    )))];
    if let ResolutionAction::Reauth { .. } = resolution.action {
        effects.push(Effect::Navigate(NavigationTarget::Login));
    }
    effects
}

fn fail_login(state: &mut AppState, resolution: Resolution) -> Vec<Effect> {
    state.login.error_message = Some(resolution.message.clone());
    state.login.requirement = LoginRequirement::ErrorHandling;
    failure_effects("login", &resolution)
}

fn fail_profile(state: &mut AppState, resolution: Resolution) -> Vec<Effect> {
    state.profile.error_message = Some(resolution.message.clone());
    failure_effects("profile", &resolution)
}

fn complete_sign_out(state: &mut AppState) -> Vec<Effect> {
    state.authenticated = false;
    state.login.reset();
    state.profile = ProfileState::default();
    vec![
        Effect::Navigate(NavigationTarget::Login),
        Effect::Log(LogEvent::info("signed out")),
    ]
}
