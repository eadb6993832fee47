//! Login and sign-out use cases.

use crate::usecases::boundary::{AuthBoundary, AuthBoundaryError, SessionDto};
use halo_core::{DomainFault, SystemFailure, UseCaseError};
use halo_session::{SessionCache, SessionCredential};
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// Rejections the code-request operation anticipates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestCodeFailure {
    /// The service refused to send a code to this address.
    #[error("email rejected")]
    EmailRejected,
}

impl DomainFault for RequestCodeFailure {
    fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::EmailRejected => Some("That email address was not accepted."),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Rejections the redemption operations anticipate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RedeemFailure {
    /// The code expired before it was redeemed.
    #[error("code expired")]
    CodeExpired,
    /// The code did not match.
    #[error("code mismatch")]
    CodeMismatch,
    /// Too many wrong codes.
    #[error("attempts exhausted")]
    AttemptsExhausted,
    /// The provider grant was refused.
    #[error("grant rejected")]
    GrantRejected,
}

impl DomainFault for RedeemFailure {
    fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::CodeExpired => Some("That code has expired. Request a new one."),
            Self::CodeMismatch => Some("That code isn't right. Check it and try again."),
            Self::AttemptsExhausted => Some("Too many wrong codes. Request a new one."),
            Self::GrantRejected => Some("The sign-in provider rejected this login."),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sign-out anticipates no domain rejections: a revoked session counts as
/// success, and everything else is out of contract or a system failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignOutFailure {}

impl DomainFault for SignOutFailure {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// System-failure mapping shared by every auth operation's transport arms.
///
/// Returns `None` for domain arms, which each classifier then sorts into its
/// own contract or out-of-contract buckets.
fn transport_failure(error: &AuthBoundaryError) -> Option<SystemFailure> {
    match error {
        AuthBoundaryError::Unreachable { detail } => Some(SystemFailure::unavailable(detail)),
        AuthBoundaryError::RateLimited { retry_after_secs } => {
            Some(SystemFailure::rate_limited(*retry_after_secs))
        }
        AuthBoundaryError::MalformedResponse { detail } => {
            Some(SystemFailure::contract_violation(detail))
        }
        AuthBoundaryError::Unexpected { detail } => Some(SystemFailure::unknown(detail)),
        AuthBoundaryError::EmailRejected
        | AuthBoundaryError::CodeExpired
        | AuthBoundaryError::CodeMismatch
        | AuthBoundaryError::AttemptsExhausted
        | AuthBoundaryError::GrantRejected
        | AuthBoundaryError::SessionRevoked => None,
    }
}

fn classify_request_code(
    error: AuthBoundaryError,
) -> UseCaseError<RequestCodeFailure, AuthBoundaryError> {
    if let Some(system) = transport_failure(&error) {
        return system.into();
    }
    match error {
        AuthBoundaryError::EmailRejected => {
            UseCaseError::Contract(RequestCodeFailure::EmailRejected)
        }
        other => UseCaseError::OutOfContract(other),
    }
}

fn classify_redeem(error: AuthBoundaryError) -> UseCaseError<RedeemFailure, AuthBoundaryError> {
    if let Some(system) = transport_failure(&error) {
        return system.into();
    }
    match error {
        AuthBoundaryError::CodeExpired => UseCaseError::Contract(RedeemFailure::CodeExpired),
        AuthBoundaryError::CodeMismatch => UseCaseError::Contract(RedeemFailure::CodeMismatch),
        AuthBoundaryError::AttemptsExhausted => {
            UseCaseError::Contract(RedeemFailure::AttemptsExhausted)
        }
        AuthBoundaryError::GrantRejected => UseCaseError::Contract(RedeemFailure::GrantRejected),
        other => UseCaseError::OutOfContract(other),
    }
}

fn classify_sign_out(error: AuthBoundaryError) -> UseCaseError<SignOutFailure, AuthBoundaryError> {
    if let Some(system) = transport_failure(&error) {
        return system.into();
    }
    UseCaseError::OutOfContract(error)
}

/// Turn a boundary token pair into a validated credential.
///
/// Empty tokens mean the service broke its schema, so the failure is a
/// contract violation, not a domain rejection.
fn credential_from_dto<C>(dto: SessionDto) -> Result<SessionCredential, UseCaseError<C, AuthBoundaryError>> {
    SessionCredential::new(dto.access_token, dto.refresh_token)
        .map_err(|e| SystemFailure::contract_violation(format!("session dto: {e}")).into())
}

/// Ask the auth service to email a one-time code.
pub struct RequestLoginCode {
    auth: Arc<dyn AuthBoundary>,
}

impl RequestLoginCode {
    /// Build over an auth boundary.
    pub fn new(auth: Arc<dyn AuthBoundary>) -> Self {
        Self { auth }
    }

    /// Request a code for `email`.
    pub async fn run(
        &self,
        email: &str,
    ) -> Result<(), UseCaseError<RequestCodeFailure, AuthBoundaryError>> {
        self.auth
            .request_code(email)
            .await
            .map_err(classify_request_code)
    }
}

/// Redeem an emailed one-time code for a session.
///
/// Redemption deliberately does not touch the session cache: the validated
/// credential travels back through the result intent, and only a result that
/// passes the reducer's stale check is committed. A superseded redemption
/// therefore never writes the cache.
pub struct RedeemLoginCode {
    auth: Arc<dyn AuthBoundary>,
}

impl RedeemLoginCode {
    /// Build over an auth boundary.
    pub fn new(auth: Arc<dyn AuthBoundary>) -> Self {
        Self { auth }
    }

    /// Redeem `code` for `email`, returning the validated credential.
    pub async fn run(
        &self,
        email: &str,
        code: &str,
    ) -> Result<SessionCredential, UseCaseError<RedeemFailure, AuthBoundaryError>> {
        let dto = self
            .auth
            .redeem_code(email, code)
            .await
            .map_err(classify_redeem)?;
        credential_from_dto(dto)
    }
}

/// Redeem an external provider's grant for a session.
///
/// Same contract as [`RedeemLoginCode`]: the credential is returned, never
/// stored here.
pub struct RedeemProviderGrant {
    auth: Arc<dyn AuthBoundary>,
}

impl RedeemProviderGrant {
    /// Build over an auth boundary.
    pub fn new(auth: Arc<dyn AuthBoundary>) -> Self {
        Self { auth }
    }

    /// Redeem `grant`, returning the validated credential.
    pub async fn run(
        &self,
        grant: &str,
    ) -> Result<SessionCredential, UseCaseError<RedeemFailure, AuthBoundaryError>> {
        let dto = self
            .auth
            .redeem_grant(grant)
            .await
            .map_err(classify_redeem)?;
        credential_from_dto(dto)
    }
}

/// Revoke the session remotely, then clear it locally.
///
/// The local clear always runs, whatever the remote revoke said; signing out
/// must never leave a usable credential behind because the network was down.
pub struct SignOut {
    auth: Arc<dyn AuthBoundary>,
    session: Arc<SessionCache>,
}

impl SignOut {
    /// Build over an auth boundary and the session cache.
    pub fn new(auth: Arc<dyn AuthBoundary>, session: Arc<SessionCache>) -> Self {
        Self { auth, session }
    }

    /// Sign out. [`AuthBoundaryError::SessionRevoked`] counts as success, so
    /// repeating a half-finished sign-out is idempotent.
    pub async fn run(&self) -> Result<(), UseCaseError<SignOutFailure, AuthBoundaryError>> {
        let revoke_result = match self.session.refresh_token() {
            Some(refresh_token) => match self.auth.revoke(&refresh_token).await {
                Ok(()) | Err(AuthBoundaryError::SessionRevoked) => Ok(()),
                Err(other) => Err(classify_sign_out(other)),
            },
            // Nothing to revoke; still clear below.
            None => Ok(()),
        };
        self.session.clear().await;
        revoke_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use halo_effects::MemoryBlobStore;
    use halo_session::Launch;
    use parking_lot::Mutex;

    /// Scripted auth boundary: pops the next result per method.
    #[derive(Default)]
    struct ScriptedAuth {
        redeem_results: Mutex<Vec<Result<SessionDto, AuthBoundaryError>>>,
        revoke_results: Mutex<Vec<Result<(), AuthBoundaryError>>>,
        revoked_tokens: Mutex<Vec<String>>,
    }

    fn dto(tag: &str) -> SessionDto {
        SessionDto {
            access_token: format!("access-{tag}"),
            refresh_token: format!("refresh-{tag}"),
        }
    }

    #[async_trait]
    impl AuthBoundary for ScriptedAuth {
        async fn request_code(&self, _email: &str) -> Result<(), AuthBoundaryError> {
            Ok(())
        }

        async fn redeem_code(
            &self,
            _email: &str,
            _code: &str,
        ) -> Result<SessionDto, AuthBoundaryError> {
            self.redeem_results.lock().remove(0)
        }

        async fn redeem_grant(&self, _grant: &str) -> Result<SessionDto, AuthBoundaryError> {
            self.redeem_results.lock().remove(0)
        }

        async fn revoke(&self, refresh_token: &str) -> Result<(), AuthBoundaryError> {
            self.revoked_tokens.lock().push(refresh_token.to_string());
            self.revoke_results.lock().remove(0)
        }
    }

    async fn empty_session() -> Arc<SessionCache> {
        Arc::new(SessionCache::open(Arc::new(MemoryBlobStore::new()), Launch::First).await)
    }

    #[tokio::test]
    async fn redeem_returns_the_validated_credential() {
        let auth = Arc::new(ScriptedAuth::default());
        auth.redeem_results.lock().push(Ok(dto("1")));

        let redeemed = RedeemLoginCode::new(auth)
            .run("a@b.co", "123456")
            .await
            .unwrap();
        assert_eq!(redeemed.access_token(), "access-1");
        assert_eq!(redeemed.refresh_token(), "refresh-1");
    }

    #[tokio::test]
    async fn redeem_classifies_domain_and_transport_arms() {
        let auth = Arc::new(ScriptedAuth::default());
        {
            let mut results = auth.redeem_results.lock();
            results.push(Err(AuthBoundaryError::CodeMismatch));
            results.push(Err(AuthBoundaryError::RateLimited {
                retry_after_secs: Some(30),
            }));
            results.push(Err(AuthBoundaryError::SessionRevoked));
        }
        let redeem = RedeemLoginCode::new(auth);

        let mismatch = redeem.run("a@b.co", "000000").await.unwrap_err();
        assert_eq!(mismatch.contract(), Some(&RedeemFailure::CodeMismatch));

        let limited = redeem.run("a@b.co", "000000").await.unwrap_err();
        assert_eq!(
            limited.system(),
            Some(&SystemFailure::RateLimited {
                retry_after_secs: Some(30)
            })
        );

        let revoked = redeem.run("a@b.co", "000000").await.unwrap_err();
        assert_eq!(
            revoked.out_of_contract(),
            Some(&AuthBoundaryError::SessionRevoked)
        );
    }

    #[tokio::test]
    async fn redeem_rejects_empty_tokens_as_contract_violation() {
        let auth = Arc::new(ScriptedAuth::default());
        auth.redeem_results.lock().push(Ok(SessionDto {
            access_token: String::new(),
            refresh_token: "refresh-1".to_string(),
        }));

        let error = RedeemProviderGrant::new(auth).run("grant").await.unwrap_err();
        assert!(matches!(
            error.system(),
            Some(SystemFailure::ContractViolation { .. })
        ));
    }

    #[tokio::test]
    async fn sign_out_clears_locally_even_when_revoke_fails() {
        let auth = Arc::new(ScriptedAuth::default());
        auth.revoke_results.lock().push(Err(AuthBoundaryError::Unreachable {
            detail: "offline".to_string(),
        }));
        let session = empty_session().await;
        session
            .update(SessionCredential::new("access-1", "refresh-1").unwrap())
            .await
            .unwrap();

        let result = SignOut::new(auth.clone(), session.clone()).run().await;
        assert!(matches!(
            result.unwrap_err().system(),
            Some(SystemFailure::Unavailable { .. })
        ));
        assert_eq!(session.access_token(), None);
        assert_eq!(auth.revoked_tokens.lock().as_slice(), &["refresh-1"]);
    }

    #[tokio::test]
    async fn already_revoked_session_counts_as_signed_out() {
        let auth = Arc::new(ScriptedAuth::default());
        auth.revoke_results
            .lock()
            .push(Err(AuthBoundaryError::SessionRevoked));
        let session = empty_session().await;
        session
            .update(SessionCredential::new("access-1", "refresh-1").unwrap())
            .await
            .unwrap();

        assert!(SignOut::new(auth, session.clone()).run().await.is_ok());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn sign_out_without_a_session_skips_the_boundary() {
        let auth = Arc::new(ScriptedAuth::default());
        let session = empty_session().await;

        assert!(SignOut::new(auth.clone(), session).run().await.is_ok());
        assert!(auth.revoked_tokens.lock().is_empty());
    }
}
