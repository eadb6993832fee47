//! External intents: platform callbacks from outside the core.

use super::ReducerEnv;
use crate::effect::{Effect, LogEvent};
use crate::intent::ExternalIntent;
use crate::state::{AppState, LoginRequirement};

pub(super) fn reduce(
    state: &mut AppState,
    intent: ExternalIntent,
    env: &ReducerEnv,
) -> Vec<Effect> {
    match intent {
        // Grant redemption shares the login slot, so it supersedes any
        // in-flight code request or redemption.
        ExternalIntent::ProviderGrantReceived { grant } => {
            let request = env.mint();
            state.login.is_loading = true;
            state.login.error_message = None;
            state.login.latest_request = Some(request);
            vec![
                Effect::RedeemGrant { request, grant },
                Effect::Log(LogEvent::debug(format!(
                    "redeeming provider grant ({request})"
                ))),
            ]
        }

        ExternalIntent::ProviderLoginFailed { reason } => {
            state.login.is_loading = false;
            state.login.error_message =
                Some("Sign-in with the provider didn't complete.".to_string());
            state.login.requirement = LoginRequirement::ErrorHandling;
            // The provider's wording is diagnostic only.
            vec![Effect::Log(LogEvent::warn(format!(
                "provider login failed: {reason}"
            )))]
        }
    }
}
