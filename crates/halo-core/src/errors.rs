//! Failure vocabulary shared by every use case.
//!
//! A failed use-case invocation is always one of three things: a rejection
//! the operation anticipated ([`UseCaseError::Contract`]), a boundary error
//! it recognizes but did not anticipate ([`UseCaseError::OutOfContract`]),
//! or system-level trouble folded into the closed [`SystemFailure`] set.
//! Classification out of a boundary enum is written as an exhaustive `match`
//! per use case, so adding a boundary arm is a compile error until every
//! operation has decided where it belongs.

use std::any::Any;
use std::fmt;
use thiserror::Error;

/// Failure modes that are about the system rather than the domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemFailure {
    /// Timeouts, connectivity loss, upstream 5xx.
    #[error("dependency unavailable: {detail}")]
    Unavailable {
        /// What failed, for diagnostics.
        detail: String,
    },

    /// The upstream asked us to back off.
    #[error("rate limited by upstream")]
    RateLimited {
        /// Server-provided cooldown hint, if any.
        retry_after_secs: Option<u64>,
    },

    /// Undecodable payloads, schema drift, protocol mismatch.
    #[error("contract violation: {detail}")]
    ContractViolation {
        /// What failed to decode or line up.
        detail: String,
    },

    /// A "should never happen" condition, with the reason preserved.
    #[error("invariant violation: {reason}")]
    InvariantViolation {
        /// Why the invariant holder gave up.
        reason: String,
    },

    /// Anything that fits none of the above.
    #[error("unknown failure: {detail}")]
    Unknown {
        /// Whatever description was available.
        detail: String,
    },
}

impl SystemFailure {
    /// Dependency-unavailable failure.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::Unavailable {
            detail: detail.into(),
        }
    }

    /// Rate-limit failure with an optional cooldown hint.
    pub fn rate_limited(retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Contract-violation failure.
    pub fn contract_violation(detail: impl Into<String>) -> Self {
        Self::ContractViolation {
            detail: detail.into(),
        }
    }

    /// Invariant-violation failure.
    pub fn invariant_violation(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Catch-all failure.
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown {
            detail: detail.into(),
        }
    }
}

/// Error contract of a single use case.
///
/// `C` enumerates the domain rejections the operation anticipates and the
/// feature UX handles specifically; `B` is the raw boundary error type,
/// carried whole when the boundary reported something the operation did not
/// anticipate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UseCaseError<C, B> {
    /// Anticipated domain rejection.
    #[error("contract failure: {0}")]
    Contract(C),

    /// Recognized but unanticipated boundary failure.
    #[error("out-of-contract failure: {0}")]
    OutOfContract(B),

    /// Transport, infrastructure, or should-never-happen trouble.
    #[error(transparent)]
    System(SystemFailure),
}

impl<C, B> UseCaseError<C, B> {
    /// Whether this is an anticipated domain rejection.
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// The contract rejection, if that is what this is.
    pub fn contract(&self) -> Option<&C> {
        match self {
            Self::Contract(c) => Some(c),
            _ => None,
        }
    }

    /// The raw boundary error, if this fell outside the contract.
    pub fn out_of_contract(&self) -> Option<&B> {
        match self {
            Self::OutOfContract(b) => Some(b),
            _ => None,
        }
    }

    /// The system failure, if that is what this is.
    pub fn system(&self) -> Option<&SystemFailure> {
        match self {
            Self::System(s) => Some(s),
            _ => None,
        }
    }
}

impl<C, B> From<SystemFailure> for UseCaseError<C, B> {
    fn from(failure: SystemFailure) -> Self {
        Self::System(failure)
    }
}

/// Object-safe view of a concrete failure enum.
///
/// The resolution pipeline works over erased faults: the default path only
/// needs `Display` plus the optional user-facing message, while
/// feature-scoped resolvers recover the concrete type through
/// [`DomainFault::as_any`].
pub trait DomainFault: fmt::Display + Send + Sync + 'static {
    /// Short user-presentable message for anticipated rejections.
    ///
    /// `None` means the fault has no safe wording of its own and callers
    /// must fall back to a generic message.
    fn user_message(&self) -> Option<&'static str> {
        None
    }

    /// Concrete-type escape hatch for downcasting resolvers.
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    enum TestContract {
        #[error("code expired")]
        CodeExpired,
    }

    impl DomainFault for TestContract {
        fn user_message(&self) -> Option<&'static str> {
            Some("That code has expired.")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    enum TestBoundary {
        #[error("http 418")]
        Teapot,
    }

    type TestError = UseCaseError<TestContract, TestBoundary>;

    #[test]
    fn accessors_pick_the_right_arm() {
        let contract: TestError = UseCaseError::Contract(TestContract::CodeExpired);
        assert!(contract.is_contract());
        assert_eq!(contract.contract(), Some(&TestContract::CodeExpired));
        assert_eq!(contract.system(), None);

        let system: TestError = SystemFailure::unavailable("socket closed").into();
        assert_eq!(
            system.system(),
            Some(&SystemFailure::Unavailable {
                detail: "socket closed".to_string()
            })
        );
        assert_eq!(system.out_of_contract(), None);

        let boundary: TestError = UseCaseError::OutOfContract(TestBoundary::Teapot);
        assert_eq!(boundary.out_of_contract(), Some(&TestBoundary::Teapot));
    }

    #[test]
    fn display_names_the_arm() {
        let contract: TestError = UseCaseError::Contract(TestContract::CodeExpired);
        assert_eq!(contract.to_string(), "contract failure: code expired");

        // System arm is transparent over the failure's own message.
        let system: TestError = SystemFailure::rate_limited(Some(30)).into();
        assert_eq!(system.to_string(), "rate limited by upstream");
    }

    #[test]
    fn faults_downcast_through_as_any() {
        let fault: &dyn DomainFault = &TestContract::CodeExpired;
        assert_eq!(fault.user_message(), Some("That code has expired."));
        assert_eq!(
            fault.as_any().downcast_ref::<TestContract>(),
            Some(&TestContract::CodeExpired)
        );
        assert!(fault.as_any().downcast_ref::<TestBoundary>().is_none());
    }
}
