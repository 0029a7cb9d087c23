//! Error types for the session lifecycle.

use thiserror::Error;

/// Errors that can occur during login, verification, or session checks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The address does not look like a mailbox; nothing was sent.
    #[error("invalid email address: {email}")]
    InvalidEmail { email: String },

    /// The code is not six digits; nothing was sent.
    #[error("the verification code must be exactly 6 digits")]
    InvalidCodeFormat,

    /// `verify_code` was called with no outstanding challenge.
    #[error("no verification code has been requested")]
    CodeNotRequested,

    /// The challenge lapsed; a fresh code must be requested.
    #[error("the verification code has expired, request a new one")]
    CodeExpired,

    /// The backend refused the code; the challenge is still open, so the
    /// caller should clear the input and let the user try again.
    #[error("the verification code was rejected")]
    CodeRejected,

    /// A code was re-requested before the cooldown elapsed; no duplicate
    /// call was made.
    #[error("a code was already sent; resend available in {remaining_secs}s")]
    ResendCooldown { remaining_secs: i64 },

    /// An operation requiring a session ran while logged out.
    #[error("not logged in")]
    NotLoggedIn,

    /// The session lapsed or was rejected; the caller is now logged out.
    #[error("the session has expired, log in again")]
    SessionExpired,

    /// A login flow was started while a session is still active.
    #[error("already logged in; log out before requesting a new code")]
    AlreadyLoggedIn,
}

impl AuthError {
    /// Check if this is a local validation failure that never reached the
    /// network.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEmail { .. } | AuthError::InvalidCodeFormat
        )
    }

    /// Check if this failure ends the current login attempt (as opposed to
    /// the user simply retyping the code).
    pub fn is_terminal_for_challenge(&self) -> bool {
        matches!(self, AuthError::CodeExpired | AuthError::CodeNotRequested)
    }
}
