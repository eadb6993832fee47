//! Feature state snapshots.
//!
//! Plain value types only. The reducer loop owns the single mutable copy;
//! everyone else sees clones published through the state channel.

use halo_core::RequestId;

/// Screens the host can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Email + one-time-code login flow.
    Login,
    /// Authenticated landing screen.
    Home,
    /// Profile view/edit screen.
    Profile,
}

/// What the login screen currently asks of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginRequirement {
    /// Collect an email address.
    #[default]
    Email,
    /// Collect the one-time code sent to that address.
    OtpCode,
    /// Show the error affordance before the user continues.
    ErrorHandling,
}

/// Login flow state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoginState {
    /// Current input the flow is waiting on.
    pub requirement: LoginRequirement,
    /// Email field contents.
    pub email: String,
    /// One-time-code field contents.
    pub otp_code: String,
    /// Whether a code was successfully dispatched for the current email.
    pub code_issued: bool,
    /// Whether an async login operation is in flight.
    pub is_loading: bool,
    /// User-presentable error, if the flow is in `ErrorHandling`.
    pub error_message: Option<String>,
    /// Correlation id of the one live login operation, if any.
    pub latest_request: Option<RequestId>,
}

impl LoginState {
    /// Back to a pristine login flow (used after sign-out).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// User profile as the feature renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Name shown to other users.
    pub display_name: String,
    /// Account email; not editable here.
    pub email: String,
}

/// Draft sent to the profile boundary on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Proposed display name.
    pub display_name: String,
}

/// Profile screen state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileState {
    /// Last loaded profile, if any.
    pub profile: Option<Profile>,
    /// Display-name field contents.
    pub display_name_draft: String,
    /// Whether a load or save is in flight.
    pub is_loading: bool,
    /// User-presentable error for the profile screen.
    pub error_message: Option<String>,
    /// Correlation id of the one live profile operation, if any.
    pub latest_request: Option<RequestId>,
}

/// Root application state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Whether a session is live (mirrors the session cache).
    pub authenticated: bool,
    /// Login feature state.
    pub login: LoginState,
    /// Profile feature state.
    pub profile: ProfileState,
    /// Correlation id of the one live sign-out operation, if any.
    pub sign_out_request: Option<RequestId>,
}
