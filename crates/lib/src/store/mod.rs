//! Persisted client-side state.
//!
//! The engine keeps exactly two records between runs: the durable session
//! and the short-lived OTP challenge. [`StateStore`] abstracts where those
//! records live so the session manager stays independent of the storage
//! mechanism: an in-memory map for tests, a JSON state file for the CLI,
//! or whatever key-value surface a host embeds.

mod errors;
mod in_memory;
mod json_file;

pub use errors::StoreError;
pub use in_memory::InMemory;
pub use json_file::JsonFile;

use crate::Result;

/// Storage key for the durable session record.
pub const SESSION_KEY: &str = "session";

/// Storage key for the transient OTP challenge record.
pub const PENDING_CODE_KEY: &str = "pending_code";

/// Key-value persistence surface for engine state.
///
/// Values are opaque strings (the callers serialize with serde_json).
/// Implementations must be `Send + Sync`; the engine shares one store
/// across the session manager and the auto-save task.
pub trait StateStore: Send + Sync {
    /// Read a value, `None` when the key has never been set or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Succeeds even if the key does not exist.
    fn remove(&self, key: &str) -> Result<()>;
}
