//! Cardfolio: the client-side engine behind the Cardfolio profile editor.
//!
//! This library owns everything between the UI and the spreadsheet-script
//! backend that stores profiles:
//!
//! * **Sessions (`session`)**: the email/OTP login lifecycle: request a
//!   code, verify it, persist the resulting session, restore it on the next
//!   start, and expire or log it out.
//! * **Profiles (`profile`)**: the in-memory draft of the user's profile,
//!   dirty tracking, manual and debounced auto-save, and reconciliation with
//!   the remote store.
//! * **Gateway (`remote`)**: the single adapter that speaks the backend's
//!   URL-encoded wire format and absorbs its field-naming drift.
//! * **Store (`store`)**: a pluggable key-value surface for the persisted
//!   session and challenge records (in-memory, or a JSON state file).
//! * **Analytics (`analytics`)** and **uploads (`upload`)**: the read-only
//!   link dashboard and the image-host boundary.
//!
//! The [`Client`] facade wires these together behind a single lock so that
//! the auto-save engine and the caller can never interleave writes.

pub mod analytics;
pub mod client;
pub mod clock;
pub mod profile;
pub mod remote;
pub mod session;
pub mod settings;
pub mod store;
pub mod upload;
pub mod validation;

pub use client::Client;
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use profile::ProfileDraft;
pub use session::Session;
pub use settings::{Plan, Settings};

/// Result type used throughout the Cardfolio library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Cardfolio library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Structured authentication errors from the session module
    #[error(transparent)]
    Auth(#[from] session::AuthError),

    /// Structured draft/sync errors from the profile module
    #[error(transparent)]
    Profile(#[from] profile::ProfileError),

    /// Structured backend boundary errors from the remote module
    #[error(transparent)]
    Gateway(#[from] remote::GatewayError),

    /// Structured persistence errors from the store module
    #[error(transparent)]
    Store(#[from] store::StoreError),

    /// Structured image-host errors from the upload module
    #[error(transparent)]
    Upload(#[from] upload::UploadError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Auth(_) => "session",
            Error::Profile(_) => "profile",
            Error::Gateway(_) => "remote",
            Error::Store(_) => "store",
            Error::Upload(_) => "upload",
        }
    }

    /// Check if this error is a local validation failure that never
    /// reached the network.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Auth(err) => err.is_validation_error(),
            Error::Profile(err) => err.is_validation_error(),
            Error::Upload(err) => err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error means the session was rejected or has lapsed.
    ///
    /// Callers seeing `true` can assume the engine already forced a logout
    /// and should route the user back to the login screen.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Error::Auth(session::AuthError::SessionExpired)
                | Error::Gateway(remote::GatewayError::Unauthorized)
        )
    }

    /// Check if this error is a structured rejection reported by the backend.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, Error::Gateway(remote::GatewayError::Rejected { .. }))
    }

    /// Check if this error means no usable response arrived (connectivity
    /// failure or timeout).
    pub fn is_network_error(&self) -> bool {
        match self {
            Error::Gateway(err) => err.is_network_error() || err.is_timeout(),
            Error::Upload(err) => err.is_network_error(),
            _ => false,
        }
    }

    /// Check if this error leaves state untouched and is safe to retry by
    /// simply re-submitting.
    pub fn is_retryable(&self) -> bool {
        self.is_remote_rejection() || self.is_network_error()
    }

    /// Check if this error is persistence-related.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}
