//! User intents: field edits and submissions.

use super::ReducerEnv;
use crate::effect::{Effect, LogEvent, Toast};
use crate::intent::UserIntent;
use crate::state::{AppState, LoginRequirement, ProfileDraft};
use crate::validation::{validate_display_name, validate_email, validate_otp_code};

pub(super) fn reduce(state: &mut AppState, intent: UserIntent, env: &ReducerEnv) -> Vec<Effect> {
    match intent {
        UserIntent::EmailEdited { value } => {
            state.login.email = value;
            Vec::new()
        }
        UserIntent::OtpEdited { value } => {
            state.login.otp_code = value;
            Vec::new()
        }
        UserIntent::DisplayNameEdited { value } => {
            state.profile.display_name_draft = value;
            Vec::new()
        }
        UserIntent::EmailSubmitted => submit_email(state, env),
        UserIntent::OtpSubmitted => submit_otp(state, env),
        UserIntent::ProfileSubmitted => submit_profile(state, env),
        UserIntent::ErrorDismissed => dismiss_error(state),
        UserIntent::SignOutRequested => request_sign_out(state, env),
    }
}

/// Toast-and-log answer for input that failed a local check.
fn rejected(field: &str, error: impl std::fmt::Display) -> Vec<Effect> {
    vec![
        Effect::ShowToast(Toast::warning(error.to_string())),
        Effect::Log(LogEvent::debug(format!("{field} failed local validation"))),
    ]
}

fn submit_email(state: &mut AppState, env: &ReducerEnv) -> Vec<Effect> {
    if let Err(error) = validate_email(&state.login.email) {
        return rejected("email", error);
    }

    let request = env.mint();
    state.login.is_loading = true;
    state.login.error_message = None;
    state.login.latest_request = Some(request);
    vec![
        Effect::RequestCode {
            request,
            email: state.login.email.clone(),
        },
        Effect::Log(LogEvent::debug(format!("requesting login code ({request})"))),
    ]
}

fn submit_otp(state: &mut AppState, env: &ReducerEnv) -> Vec<Effect> {
    if !state.login.code_issued {
        return rejected("otp", "Request a code first.");
    }
    if let Err(error) = validate_otp_code(&state.login.otp_code) {
        return rejected("otp", error);
    }

    let request = env.mint();
    state.login.is_loading = true;
    state.login.error_message = None;
    state.login.latest_request = Some(request);
    vec![
        Effect::RedeemCode {
            request,
            email: state.login.email.clone(),
            code: state.login.otp_code.clone(),
        },
        Effect::Log(LogEvent::debug(format!("redeeming login code ({request})"))),
    ]
}

fn submit_profile(state: &mut AppState, env: &ReducerEnv) -> Vec<Effect> {
    if let Err(error) = validate_display_name(&state.profile.display_name_draft) {
        return rejected("display name", error);
    }

    let request = env.mint();
    state.profile.is_loading = true;
    state.profile.error_message = None;
    state.profile.latest_request = Some(request);
    vec![
        Effect::SaveProfile {
            request,
            draft: ProfileDraft {
                display_name: state.profile.display_name_draft.trim().to_string(),
            },
        },
        Effect::Log(LogEvent::debug(format!("saving profile ({request})"))),
    ]
}

fn dismiss_error(state: &mut AppState) -> Vec<Effect> {
    state.login.error_message = None;
    state.profile.error_message = None;
    if state.login.requirement == LoginRequirement::ErrorHandling {
        state.login.requirement = if state.login.code_issued {
            LoginRequirement::OtpCode
        } else {
            LoginRequirement::Email
        };
    }
    Vec::new()
}

fn request_sign_out(state: &mut AppState, env: &ReducerEnv) -> Vec<Effect> {
    let request = env.mint();
    state.sign_out_request = Some(request);
    vec![
        Effect::SignOut { request },
        Effect::Log(LogEvent::debug(format!("signing out ({request})"))),
    ]
}
