//! The session manager.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::from_str;
use tracing::{debug, info, warn};

use super::{AuthError, AuthState, PendingCode, Session};
use crate::clock::Clock;
use crate::profile::ProfileDraft;
use crate::remote::{Gateway, GatewayError};
use crate::settings::Settings;
use crate::store::{PENDING_CODE_KEY, SESSION_KEY, StateStore, StoreError};
use crate::validation;
use crate::{Error, Result};

/// What a successful verification hands back to the caller.
#[derive(Debug, Clone)]
pub struct Login {
    pub session: Session,
    /// Present when the backend coupled verification with profile
    /// retrieval; `None` means the profile must be loaded separately.
    pub profile: Option<ProfileDraft>,
}

/// Owns the login lifecycle and the persisted session/challenge records.
pub struct SessionManager {
    settings: Settings,
    gateway: Arc<dyn Gateway>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    state: AuthState,
}

impl SessionManager {
    /// Create a manager in the logged-out state.
    ///
    /// Call [`restore_session`](Self::restore_session) afterwards to pick
    /// up a session persisted by an earlier run.
    pub fn new(
        settings: Settings,
        gateway: Arc<dyn Gateway>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            gateway,
            store,
            clock,
            state: AuthState::LoggedOut,
        }
    }

    // === State accessors ===

    /// Current position in the login state machine.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// The active session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::LoggedIn(session) => Some(session),
            _ => None,
        }
    }

    /// Time left before a code can be re-requested, `None` once resend is
    /// allowed (or when no challenge is outstanding). Drives the countdown
    /// a front end shows next to its resend button.
    pub fn resend_remaining(&self) -> Option<std::time::Duration> {
        let AuthState::CodeRequested(pending) = &self.state else {
            return None;
        };
        let now = self.clock.now();
        if pending.is_expired(now) {
            return None;
        }
        let cooldown_end = add(pending.issued_at, self.settings.resend_cooldown);
        (cooldown_end - now).to_std().ok().filter(|d| !d.is_zero())
    }

    // === Login flow ===

    /// Ask the backend to send a verification code to `email`.
    ///
    /// A syntactically invalid address never reaches the network, and a
    /// repeat request for the same address inside the cooldown window is
    /// rejected client-side without a duplicate call. A request for a
    /// *different* address replaces the outstanding challenge.
    pub async fn request_code(&mut self, email: &str) -> Result<()> {
        let email = email.trim();
        if !validation::email_is_valid(email) {
            return Err(AuthError::InvalidEmail {
                email: email.to_string(),
            }
            .into());
        }
        if matches!(self.state, AuthState::LoggedIn(_)) {
            return Err(AuthError::AlreadyLoggedIn.into());
        }

        let now = self.clock.now();
        if let AuthState::CodeRequested(pending) = &self.state
            && pending.email == email
            && !pending.is_expired(now)
        {
            let cooldown_end = add(pending.issued_at, self.settings.resend_cooldown);
            if now < cooldown_end {
                let remaining_secs = (cooldown_end - now).num_seconds().max(1);
                return Err(AuthError::ResendCooldown { remaining_secs }.into());
            }
        }

        self.gateway.request_code(email).await?;

        let pending = PendingCode {
            email: email.to_string(),
            issued_at: now,
            expires_at: add(now, self.settings.code_ttl),
        };
        self.store.set(PENDING_CODE_KEY, &encode(&pending)?)?;
        info!(email, "verification code requested");
        self.state = AuthState::CodeRequested(pending);
        Ok(())
    }

    /// Present the code the user received.
    ///
    /// On success the session is built, persisted, and the challenge is
    /// consumed. Failures are typed so the caller can react: a rejected
    /// code keeps the challenge open (clear the input, try again), an
    /// expired one discards it (prompt a fresh request). Nothing here
    /// retries on its own.
    pub async fn verify_code(&mut self, code: &str) -> Result<Login> {
        if !validation::code_is_valid(code) {
            return Err(AuthError::InvalidCodeFormat.into());
        }

        let pending = match &self.state {
            AuthState::CodeRequested(pending) => pending.clone(),
            AuthState::LoggedIn(_) => return Err(AuthError::AlreadyLoggedIn.into()),
            AuthState::LoggedOut => return Err(AuthError::CodeNotRequested.into()),
        };

        let now = self.clock.now();
        if pending.is_expired(now) {
            self.abandon_challenge()?;
            return Err(AuthError::CodeExpired.into());
        }

        match self.gateway.verify_code(&pending.email, code).await {
            Ok(grant) => {
                let session = Session {
                    email: pending.email,
                    token: grant.token,
                    expires_at: add(now, self.settings.session_ttl),
                };
                self.store.set(SESSION_KEY, &encode(&session)?)?;
                self.store.remove(PENDING_CODE_KEY)?;
                info!(email = %session.email, "logged in");
                self.state = AuthState::LoggedIn(session.clone());
                Ok(Login {
                    session,
                    profile: grant.profile,
                })
            }
            Err(err) if err.is_expired_code() => {
                self.abandon_challenge()?;
                Err(AuthError::CodeExpired.into())
            }
            Err(GatewayError::Rejected { message }) => {
                debug!(%message, "verification code rejected");
                Err(AuthError::CodeRejected.into())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Abandon an outstanding challenge and return to the logged-out state
    /// (the "back" action on a login form). Idempotent.
    pub fn cancel_login(&mut self) -> Result<()> {
        if matches!(self.state, AuthState::CodeRequested(_)) {
            self.abandon_challenge()?;
        }
        Ok(())
    }

    /// Replay the persisted session, if one is still live.
    ///
    /// Pure storage read, no network round trip, which is what lets a
    /// front end skip its login screen on reload. An expired or unreadable
    /// record is cleared. An unexpired challenge is also replayed, so a
    /// reload mid-login lands back on the code prompt.
    pub fn restore_session(&mut self) -> Result<Option<Session>> {
        let now = self.clock.now();

        if let Some(json) = self.store.get(SESSION_KEY)? {
            match from_str::<Session>(&json) {
                Ok(session) if !session.is_expired(now) => {
                    debug!(email = %session.email, "session restored");
                    self.state = AuthState::LoggedIn(session.clone());
                    return Ok(Some(session));
                }
                Ok(_) => {
                    debug!("persisted session has expired, clearing");
                    self.store.remove(SESSION_KEY)?;
                }
                Err(err) => {
                    warn!(error = %err, "unreadable session record, clearing");
                    self.store.remove(SESSION_KEY)?;
                }
            }
        }

        self.state = AuthState::LoggedOut;
        if let Some(json) = self.store.get(PENDING_CODE_KEY)? {
            match from_str::<PendingCode>(&json) {
                Ok(pending) if !pending.is_expired(now) => {
                    self.state = AuthState::CodeRequested(pending);
                }
                _ => {
                    self.store.remove(PENDING_CODE_KEY)?;
                }
            }
        }
        Ok(None)
    }

    /// Clear the persisted session and challenge and return to the
    /// logged-out state. Safe to call with no active session.
    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(SESSION_KEY)?;
        self.store.remove(PENDING_CODE_KEY)?;
        if !matches!(self.state, AuthState::LoggedOut) {
            info!("logged out");
        }
        self.state = AuthState::LoggedOut;
        Ok(())
    }

    // === Internal transitions ===

    /// The session in force, or the typed reason there is none.
    ///
    /// Detecting expiry here transitions straight to logged-out: any
    /// authenticated call is an expiry checkpoint.
    pub fn require_session(&mut self) -> Result<Session> {
        let now = self.clock.now();
        match &self.state {
            AuthState::LoggedIn(session) if !session.is_expired(now) => Ok(session.clone()),
            AuthState::LoggedIn(_) => {
                warn!("session expired, logging out");
                self.logout()?;
                Err(AuthError::SessionExpired.into())
            }
            _ => Err(AuthError::NotLoggedIn.into()),
        }
    }

    /// Force a logout because the backend rejected the token.
    pub(crate) fn expire_now(&mut self) -> Result<()> {
        warn!("session rejected by the backend, logging out");
        self.logout()
    }

    fn abandon_challenge(&mut self) -> Result<()> {
        self.store.remove(PENDING_CODE_KEY)?;
        self.state = AuthState::LoggedOut;
        Ok(())
    }
}

/// Add a configured duration to an instant, saturating instead of
/// overflowing on absurd configurations.
fn add(at: DateTime<Utc>, duration: std::time::Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Store(StoreError::Serialize { source: e }))
}
