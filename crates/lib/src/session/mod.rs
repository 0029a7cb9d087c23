//! Session lifecycle: email/OTP login, persisted restore, expiry, logout.
//!
//! The [`SessionManager`] walks the login state machine
//! (`LoggedOut → CodeRequested → LoggedIn`) and is the only writer of the
//! persisted session and challenge records. The verification secret never
//! leaves the challenge window: the engine sees a code exactly once, on its
//! way to the backend.

mod errors;
mod manager;
mod types;

pub use errors::AuthError;
pub use manager::{Login, SessionManager};
pub use types::{AuthState, PendingCode, Session};
