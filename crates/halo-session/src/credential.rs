//! Validated access/refresh token pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a token pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Access token was empty.
    #[error("access token is empty")]
    EmptyAccessToken,
    /// Refresh token was empty.
    #[error("refresh token is empty")]
    EmptyRefreshToken,
}

/// One authenticated session's token pair.
///
/// Both tokens are non-empty by construction; "no session" is represented by
/// the absence of a credential, never by empty strings. `Debug` redacts both
/// tokens so credentials can appear in logs safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    access_token: String,
    refresh_token: String,
}

impl SessionCredential {
    /// Build a credential, rejecting empty tokens.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let credential = Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        };
        credential.validate()?;
        Ok(credential)
    }

    /// Re-check the non-emptiness invariant.
    ///
    /// Deserialized credentials bypass [`SessionCredential::new`], so restore
    /// paths call this before trusting a blob.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.access_token.is_empty() {
            return Err(CredentialError::EmptyAccessToken);
        }
        if self.refresh_token.is_empty() {
            return Err(CredentialError::EmptyRefreshToken);
        }
        Ok(())
    }

    /// Bearer token attached to authenticated requests.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token used to obtain a fresh access token.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_tokens() {
        let credential = SessionCredential::new("access-1", "refresh-1").unwrap();
        assert_eq!(credential.access_token(), "access-1");
        assert_eq!(credential.refresh_token(), "refresh-1");
    }

    #[test]
    fn rejects_empty_tokens() {
        assert_eq!(
            SessionCredential::new("", "refresh-1"),
            Err(CredentialError::EmptyAccessToken)
        );
        assert_eq!(
            SessionCredential::new("access-1", ""),
            Err(CredentialError::EmptyRefreshToken)
        );
    }

    #[test]
    fn debug_redacts_tokens() {
        let credential = SessionCredential::new("super-secret", "even-more-secret").unwrap();
        let shown = format!("{credential:?}");
        assert!(shown.contains("[REDACTED]"));
        assert!(!shown.contains("super-secret"));
        assert!(!shown.contains("even-more-secret"));
    }

    #[test]
    fn serde_round_trip() {
        let credential = SessionCredential::new("access-1", "refresh-1").unwrap();
        let bytes = serde_json::to_vec(&credential).unwrap();
        let back: SessionCredential = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, credential);
    }

    #[test]
    fn deserialized_empty_tokens_fail_validation() {
        let raw = br#"{"access_token":"","refresh_token":"r"}"#;
        let parsed: SessionCredential = serde_json::from_slice(raw).unwrap();
        assert_eq!(parsed.validate(), Err(CredentialError::EmptyAccessToken));
    }
}
