//! Profile read and write use cases.

use crate::state::{Profile, ProfileDraft};
use crate::usecases::boundary::{ProfileBoundary, ProfileBoundaryError, ProfileDto};
use halo_core::{DomainFault, SystemFailure, UseCaseError};
use halo_session::SessionCache;
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// Rejections the profile operations anticipate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileFailure {
    /// No usable access token: the cache is empty or the service said
    /// unauthorized. The user has to sign in again.
    #[error("session expired")]
    SessionExpired,
    /// The service rejected the submitted content.
    #[error("profile content rejected: {detail}")]
    Rejected {
        /// What the service objected to; diagnostic only.
        detail: String,
    },
}

impl DomainFault for ProfileFailure {
    fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::SessionExpired => Some("Your session has expired. Sign in again."),
            Self::Rejected { .. } => Some("That profile change was not accepted."),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn classify(error: ProfileBoundaryError) -> UseCaseError<ProfileFailure, ProfileBoundaryError> {
    match error {
        ProfileBoundaryError::Unauthorized => UseCaseError::Contract(ProfileFailure::SessionExpired),
        ProfileBoundaryError::ValidationRejected { detail } => {
            UseCaseError::Contract(ProfileFailure::Rejected { detail })
        }
        ProfileBoundaryError::Unreachable { ref detail } => {
            SystemFailure::unavailable(detail).into()
        }
        ProfileBoundaryError::RateLimited { retry_after_secs } => {
            SystemFailure::rate_limited(retry_after_secs).into()
        }
        ProfileBoundaryError::MalformedResponse { ref detail } => {
            SystemFailure::contract_violation(detail).into()
        }
        ProfileBoundaryError::Unexpected { ref detail } => SystemFailure::unknown(detail).into(),
        // Forbidden is real but unanticipated here; the resolver chain turns
        // it into an access-denied resolution.
        ProfileBoundaryError::Forbidden => UseCaseError::OutOfContract(error),
    }
}

impl From<ProfileDto> for Profile {
    fn from(dto: ProfileDto) -> Self {
        Self {
            display_name: dto.display_name,
            email: dto.email,
        }
    }
}

/// Fetch the signed-in user's profile.
pub struct LoadProfile {
    profile: Arc<dyn ProfileBoundary>,
    session: Arc<SessionCache>,
}

impl LoadProfile {
    /// Build over a profile boundary and the session cache.
    pub fn new(profile: Arc<dyn ProfileBoundary>, session: Arc<SessionCache>) -> Self {
        Self { profile, session }
    }

    /// Load the profile. An absent access token short-circuits to
    /// [`ProfileFailure::SessionExpired`] without touching the boundary.
    pub async fn run(&self) -> Result<Profile, UseCaseError<ProfileFailure, ProfileBoundaryError>> {
        let Some(access_token) = self.session.access_token() else {
            return Err(UseCaseError::Contract(ProfileFailure::SessionExpired));
        };
        let dto = self.profile.fetch(&access_token).await.map_err(classify)?;
        Ok(dto.into())
    }
}

/// Save a profile draft.
pub struct SaveProfile {
    profile: Arc<dyn ProfileBoundary>,
    session: Arc<SessionCache>,
}

impl SaveProfile {
    /// Build over a profile boundary and the session cache.
    pub fn new(profile: Arc<dyn ProfileBoundary>, session: Arc<SessionCache>) -> Self {
        Self { profile, session }
    }

    /// Save `draft`. An absent access token short-circuits to
    /// [`ProfileFailure::SessionExpired`] without touching the boundary.
    pub async fn run(
        &self,
        draft: &ProfileDraft,
    ) -> Result<Profile, UseCaseError<ProfileFailure, ProfileBoundaryError>> {
        let Some(access_token) = self.session.access_token() else {
            return Err(UseCaseError::Contract(ProfileFailure::SessionExpired));
        };
        let dto = self
            .profile
            .save(&access_token, draft)
            .await
            .map_err(classify)?;
        Ok(dto.into())
    }
}
