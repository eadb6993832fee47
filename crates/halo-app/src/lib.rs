//! Headless application core: intents in, state and effects out.
//!
//! The crate is organized around a unidirectional loop. Every input becomes
//! an [`Intent`]; the pure [`reducer`] turns `(state, intent)` into a new
//! state plus a list of [`Effect`]s; the [`executor`] performs the async
//! effects and feeds their results back as intents; failures pass through
//! the [`resolve`] pipeline so the UI only ever sees a bounded vocabulary
//! of resolutions. [`app::AppCore`] owns the loop and exposes the reactive
//! surfaces hosts bind to.
//!
//! Nothing in this crate renders, routes, or speaks a wire protocol; the
//! remote side is a pair of boundary traits and the durable side is the
//! `halo-core` blob-store contract.

pub mod app;
pub mod config;
pub mod effect;
pub mod executor;
pub mod input;
pub mod intent;
pub mod reducer;
pub mod resolve;
pub mod state;
pub mod usecases;
pub mod validation;

pub use app::{AppCore, AppDeps, TextInput};
pub use config::AppConfig;
pub use effect::{Effect, LogEvent, LogLevel, NavigationTarget, OpSlot, Toast, ToastLevel};
pub use executor::EffectExecutor;
pub use input::{InputFilter, TextField};
pub use intent::{
    ExternalIntent, Intent, IntentFamily, InternalIntent, LifecycleIntent, UserIntent,
};
pub use reducer::{reduce, ReducerEnv};
pub use resolve::{
    FaultView, ReauthMode, ResolveFault, Resolution, ResolutionAction, ResolverChain,
};
pub use state::{
    AppState, LoginRequirement, LoginState, Profile, ProfileDraft, ProfileState, Screen,
};
