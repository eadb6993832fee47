//! Lifecycle intents: start-up and screen visibility.

use super::ReducerEnv;
use crate::effect::{Effect, LogEvent, NavigationTarget};
use crate::intent::LifecycleIntent;
use crate::state::{AppState, Screen};

pub(super) fn reduce(
    state: &mut AppState,
    intent: LifecycleIntent,
    env: &ReducerEnv,
) -> Vec<Effect> {
    match intent {
        LifecycleIntent::Started { authenticated } => {
            state.authenticated = authenticated;
            let target = if authenticated {
                NavigationTarget::Home
            } else {
                NavigationTarget::Login
            };
            vec![
                Effect::Navigate(target),
                Effect::Log(LogEvent::info(format!(
                    "core started; authenticated={authenticated}"
                ))),
            ]
        }

        LifecycleIntent::ScreenAppeared {
            screen: Screen::Profile,
        } => start_profile_load(state, env),

        LifecycleIntent::ScreenAppeared { screen } => {
            vec![Effect::Log(LogEvent::trace(format!(
                "screen appeared: {screen:?}"
            )))]
        }

        LifecycleIntent::ScreenLeft {
            screen: Screen::Profile,
        } => {
            // Abandon any in-flight profile operation; its result will fail
            // the stale check if it still arrives.
            state.profile.latest_request = None;
            state.profile.is_loading = false;
            state.profile.error_message = None;
            vec![Effect::Log(LogEvent::trace("left profile screen"))]
        }

        LifecycleIntent::ScreenLeft { screen } => {
            vec![Effect::Log(LogEvent::trace(format!(
                "screen left: {screen:?}"
            )))]
        }
    }
}

fn start_profile_load(state: &mut AppState, env: &ReducerEnv) -> Vec<Effect> {
    let request = env.mint();
    state.profile.is_loading = true;
    state.profile.error_message = None;
    state.profile.latest_request = Some(request);
    vec![
        Effect::LoadProfile { request },
        Effect::Log(LogEvent::debug(format!("loading profile ({request})"))),
    ]
}
