//! Error types for the persistence surface.

use thiserror::Error;

/// Errors that can occur reading or writing persisted engine state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// State file I/O failed.
    #[error("state file I/O failed: {source}")]
    FileIo {
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("failed to serialize state: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    /// The state file exists but could not be parsed.
    #[error("failed to parse state file: {source}")]
    Deserialize {
        #[source]
        source: serde_json::Error,
    },

    /// The state file was written by an incompatible version.
    #[error("unsupported state file version {found}; expected {expected}")]
    UnsupportedVersion { found: u8, expected: u8 },
}

impl StoreError {
    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, StoreError::FileIo { .. })
    }
}
