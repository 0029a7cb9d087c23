//! Error types for draft editing and synchronization.

use thiserror::Error;

/// Errors that can occur editing or saving the profile draft.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    /// Saves require a non-empty name.
    #[error("a name is required")]
    NameRequired,

    /// The tagline exceeds its length bound.
    #[error("the tagline is limited to {max} characters")]
    TaglineTooLong { max: usize },

    /// The plan's social-link cap was hit; the list was not modified.
    /// This is a notice for the user, not a fault.
    #[error("your plan allows at most {max} social links")]
    LinkLimitReached { max: usize },

    /// A link index pointed outside the list.
    #[error("link position {index} is out of range")]
    LinkIndexOutOfRange { index: usize },

    /// An operation needed a loaded draft and none is present.
    #[error("no profile is loaded")]
    NotLoaded,
}

impl ProfileError {
    /// Check if this is a local validation failure that never reached the
    /// network.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ProfileError::NameRequired
                | ProfileError::TaglineTooLong { .. }
                | ProfileError::LinkLimitReached { .. }
                | ProfileError::LinkIndexOutOfRange { .. }
        )
    }
}
