//! Syntactic input checks run by the reducer before any effect is emitted.
//!
//! Input that fails here never mints a [`halo_core::RequestId`] and never
//! reaches the network; the reducer answers with toast and log effects only.
//! The messages are user-presentable.

use thiserror::Error;

/// Required one-time-code length.
pub const OTP_CODE_LENGTH: usize = 6;

/// Shortest accepted display name, after trimming.
pub const DISPLAY_NAME_MIN: usize = 2;

/// Longest accepted display name, after trimming.
pub const DISPLAY_NAME_MAX: usize = 40;

/// Why an email address was rejected locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailError {
    /// Field was empty.
    #[error("Enter your email address.")]
    Empty,
    /// Not one local part and one domain around a single `@`.
    #[error("That doesn't look like an email address.")]
    Malformed,
}

/// Why a one-time code was rejected locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OtpError {
    /// Field was empty.
    #[error("Enter the code we sent you.")]
    Empty,
    /// Not exactly [`OTP_CODE_LENGTH`] digits.
    #[error("The code is {OTP_CODE_LENGTH} digits.")]
    WrongShape,
}

/// Why a display name was rejected locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisplayNameError {
    /// Trimmed name shorter than [`DISPLAY_NAME_MIN`].
    #[error("Display names need at least {DISPLAY_NAME_MIN} characters.")]
    TooShort,
    /// Trimmed name longer than [`DISPLAY_NAME_MAX`].
    #[error("Display names can have at most {DISPLAY_NAME_MAX} characters.")]
    TooLong,
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain,
/// no whitespace. Deliverability is the remote boundary's problem.
pub fn validate_email(email: &str) -> Result<(), EmailError> {
    if email.is_empty() {
        return Err(EmailError::Empty);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(EmailError::Malformed);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(EmailError::Malformed);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(EmailError::Malformed);
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(EmailError::Malformed);
    };
    if host.is_empty() || tld.is_empty() {
        return Err(EmailError::Malformed);
    }
    Ok(())
}

/// Exactly [`OTP_CODE_LENGTH`] ASCII digits.
pub fn validate_otp_code(code: &str) -> Result<(), OtpError> {
    if code.is_empty() {
        return Err(OtpError::Empty);
    }
    if code.len() != OTP_CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OtpError::WrongShape);
    }
    Ok(())
}

/// Trimmed length within `[DISPLAY_NAME_MIN, DISPLAY_NAME_MAX]`.
pub fn validate_display_name(name: &str) -> Result<(), DisplayNameError> {
    let trimmed = name.trim();
    let count = trimmed.chars().count();
    if count < DISPLAY_NAME_MIN {
        return Err(DisplayNameError::TooShort);
    }
    if count > DISPLAY_NAME_MAX {
        return Err(DisplayNameError::TooLong);
    }
    Ok(())
}
