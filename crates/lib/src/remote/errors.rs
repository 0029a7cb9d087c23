//! Error types for the backend boundary.

use thiserror::Error;

/// Errors that can occur talking to the backend.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The backend answered with a structured failure (wrong code, no
    /// profile for the address, rate limit, …).
    #[error("backend rejected the request: {message}")]
    Rejected { message: String },

    /// The backend no longer accepts the session token. Always forces a
    /// logout upstream; never retried.
    #[error("session token rejected by the backend")]
    Unauthorized,

    /// Transport-level failure: connection refused, DNS, TLS, aborted body.
    #[error("network error: {reason}")]
    Network { reason: String },

    /// No response within the configured window.
    #[error("no response from the backend within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The backend answered with something the wire adapter cannot read.
    #[error("unexpected payload from the backend: {reason}")]
    InvalidPayload { reason: String },
}

impl GatewayError {
    /// Check if this is a transport-level failure.
    pub fn is_network_error(&self) -> bool {
        matches!(self, GatewayError::Network { .. })
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout { .. })
    }

    /// Check if the token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized)
    }

    /// Check if a code-verification rejection means the code lapsed.
    ///
    /// The backend reports OTP denials as a rejected status with free-text
    /// message; "expired" in the text is the only discriminator it offers
    /// between a stale code and a wrong one.
    pub fn is_expired_code(&self) -> bool {
        matches!(
            self,
            GatewayError::Rejected { message } if message.to_ascii_lowercase().contains("expired")
        )
    }
}
