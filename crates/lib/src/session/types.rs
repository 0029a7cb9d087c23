//! Session and challenge records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated session, persisted under
/// [`store::SESSION_KEY`](crate::store::SESSION_KEY).
///
/// A session is either fully absent or fully populated; there is no
/// email-without-token state once verification completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Verified identity.
    pub email: String,
    /// Opaque bearer credential; only ever echoed back to the backend.
    pub token: String,
    /// Absolute expiry; the session is invalid from this instant on.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has lapsed as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// One outstanding OTP challenge, persisted under
/// [`store::PENDING_CODE_KEY`](crate::store::PENDING_CODE_KEY).
///
/// Lives only between "request code" and "verify code"; consumed on
/// successful verification or on expiry. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCode {
    /// Address the code was sent to.
    pub email: String,
    /// When the code was issued; the resend cooldown counts from here.
    pub issued_at: DateTime<Utc>,
    /// When the code stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl PendingCode {
    /// Whether the challenge has lapsed as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Login state machine position.
///
/// The transient "verifying" phase lives inside
/// [`SessionManager::verify_code`](super::SessionManager::verify_code) and
/// is never observable between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    CodeRequested(PendingCode),
    LoggedIn(Session),
}
