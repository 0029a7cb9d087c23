//! Draft document and save bookkeeping types.

use serde::{Deserialize, Serialize};

/// The canonical in-memory profile document.
///
/// This is the one shape the rest of the engine sees; whatever field names
/// the backend uses are translated at the wire adapter. Social links are an
/// ordered list; position is user-controlled and meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub tagline: String,
    pub phone: String,
    pub address: String,
    pub profile_pic_url: String,
    /// Public-profile slug assigned by the backend; read-only here, used to
    /// key analytics lookups.
    pub link: String,
    pub social_links: Vec<String>,
}

/// What initiated a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The user asked for it; always performs the write.
    Manual,
    /// The debounce engine fired; skipped when the draft is already clean.
    Auto,
}

/// Outcome of a successful [`ProfileSync::save`](super::ProfileSync::save).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// True when an auto-save found nothing to do and sent nothing.
    pub skipped_clean: bool,
    /// Malformed social links silently dropped from the payload (the draft
    /// keeps the user's text).
    pub dropped_links: usize,
}

impl SaveReport {
    pub(crate) fn skipped() -> Self {
        Self {
            skipped_clean: true,
            dropped_links: 0,
        }
    }
}
