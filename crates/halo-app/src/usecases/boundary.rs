//! Remote boundaries the use cases call.
//!
//! Each boundary is one trait with async methods returning a DTO or the
//! boundary's own error enum. The enums mix domain rejections (the remote
//! side understood us and said no) with transport arms (we never got a
//! usable answer); each use case classifies them into its
//! [`halo_core::UseCaseError`] with a total `match`.
//!
//! No HTTP client or wire format lives in this crate; hosts implement these
//! traits over whatever transport they have, and tests script them.

use crate::state::ProfileDraft;
use async_trait::async_trait;
use halo_core::DomainFault;
use std::any::Any;
use thiserror::Error;

/// What the auth service reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthBoundaryError {
    /// The service refused to send a code to this address.
    #[error("email rejected by the auth service")]
    EmailRejected,
    /// The one-time code expired before it was redeemed.
    #[error("one-time code expired")]
    CodeExpired,
    /// The one-time code did not match.
    #[error("one-time code mismatch")]
    CodeMismatch,
    /// Too many wrong codes for this email.
    #[error("redemption attempts exhausted")]
    AttemptsExhausted,
    /// The provider grant was refused.
    #[error("provider grant rejected")]
    GrantRejected,
    /// The session this call ran under is already revoked.
    #[error("session already revoked")]
    SessionRevoked,

    /// The service could not be reached.
    #[error("auth service unreachable: {detail}")]
    Unreachable {
        /// Transport-level detail.
        detail: String,
    },
    /// The service asked us to back off.
    #[error("auth service rate limited")]
    RateLimited {
        /// Server-provided cooldown hint, if any.
        retry_after_secs: Option<u64>,
    },
    /// The response did not decode.
    #[error("malformed auth response: {detail}")]
    MalformedResponse {
        /// What failed to decode.
        detail: String,
    },
    /// Anything the boundary could not name.
    #[error("unexpected auth failure: {detail}")]
    Unexpected {
        /// Whatever description was available.
        detail: String,
    },
}

impl DomainFault for AuthBoundaryError {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// What the profile service reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileBoundaryError {
    /// The access token was missing, expired, or revoked.
    #[error("profile request unauthorized")]
    Unauthorized,
    /// The caller may not touch this profile.
    #[error("profile access forbidden")]
    Forbidden,
    /// The service rejected the submitted profile content.
    #[error("profile content rejected: {detail}")]
    ValidationRejected {
        /// What the service objected to.
        detail: String,
    },

    /// The service could not be reached.
    #[error("profile service unreachable: {detail}")]
    Unreachable {
        /// Transport-level detail.
        detail: String,
    },
    /// The service asked us to back off.
    #[error("profile service rate limited")]
    RateLimited {
        /// Server-provided cooldown hint, if any.
        retry_after_secs: Option<u64>,
    },
    /// The response did not decode.
    #[error("malformed profile response: {detail}")]
    MalformedResponse {
        /// What failed to decode.
        detail: String,
    },
    /// Anything the boundary could not name.
    #[error("unexpected profile failure: {detail}")]
    Unexpected {
        /// Whatever description was available.
        detail: String,
    },
}

impl DomainFault for ProfileBoundaryError {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Token pair as the auth service returns it, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDto {
    /// Bearer token; may be empty if the service misbehaves.
    pub access_token: String,
    /// Refresh token; may be empty if the service misbehaves.
    pub refresh_token: String,
}

/// Profile as the profile service returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDto {
    /// Display name on record.
    pub display_name: String,
    /// Account email on record.
    pub email: String,
}

/// Remote boundary for login and session operations.
#[async_trait]
pub trait AuthBoundary: Send + Sync {
    /// Send a one-time code to `email`.
    async fn request_code(&self, email: &str) -> Result<(), AuthBoundaryError>;

    /// Redeem an emailed code for a session.
    async fn redeem_code(&self, email: &str, code: &str) -> Result<SessionDto, AuthBoundaryError>;

    /// Redeem an external provider's grant for a session.
    async fn redeem_grant(&self, grant: &str) -> Result<SessionDto, AuthBoundaryError>;

    /// Revoke the session behind `refresh_token`.
    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthBoundaryError>;
}

/// Remote boundary for profile reads and writes.
#[async_trait]
pub trait ProfileBoundary: Send + Sync {
    /// Fetch the profile of the token's owner.
    async fn fetch(&self, access_token: &str) -> Result<ProfileDto, ProfileBoundaryError>;

    /// Save a profile draft; returns the profile as stored.
    async fn save(
        &self,
        access_token: &str,
        draft: &ProfileDraft,
    ) -> Result<ProfileDto, ProfileBoundaryError>;
}
