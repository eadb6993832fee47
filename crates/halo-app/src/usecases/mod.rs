//! Stateless business operations over the remote boundaries.
//!
//! Each use case is one struct holding exactly the dependencies it needs —
//! a boundary trait object and, where the operation reads or clears the
//! session, the [`SessionCache`] as an explicit constructor argument, never
//! ambient state. Redemption is the exception by design: it returns the
//! credential and the orchestrator commits it, keeping cache writes in
//! reduce order. `run` returns a typed [`halo_core::UseCaseError`] built by
//! that operation's own total classification of the boundary enum.

mod auth;
mod boundary;
mod profile;

pub use auth::{
    RedeemFailure, RedeemLoginCode, RedeemProviderGrant, RequestCodeFailure, RequestLoginCode,
    SignOut, SignOutFailure,
};
pub use boundary::{
    AuthBoundary, AuthBoundaryError, ProfileBoundary, ProfileBoundaryError, ProfileDto, SessionDto,
};
pub use profile::{LoadProfile, ProfileFailure, SaveProfile};

use halo_session::SessionCache;
use std::sync::Arc;

/// Every operation the effect executor can start, constructed together.
pub struct UseCases {
    /// Request a one-time login code.
    pub request_code: RequestLoginCode,
    /// Redeem an emailed code for a session.
    pub redeem_code: RedeemLoginCode,
    /// Redeem an external provider's grant for a session.
    pub redeem_grant: RedeemProviderGrant,
    /// Load the signed-in user's profile.
    pub load_profile: LoadProfile,
    /// Save a profile draft.
    pub save_profile: SaveProfile,
    /// Revoke remotely and clear locally.
    pub sign_out: SignOut,
}

impl UseCases {
    /// Wire all operations over the two boundaries and the session cache.
    pub fn new(
        auth: Arc<dyn AuthBoundary>,
        profile: Arc<dyn ProfileBoundary>,
        session: Arc<SessionCache>,
    ) -> Self {
        Self {
            request_code: RequestLoginCode::new(auth.clone()),
            redeem_code: RedeemLoginCode::new(auth.clone()),
            redeem_grant: RedeemProviderGrant::new(auth.clone()),
            load_profile: LoadProfile::new(profile.clone(), session.clone()),
            save_profile: SaveProfile::new(profile, session.clone()),
            sign_out: SignOut::new(auth, session),
        }
    }
}
