//! In-memory state store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::StateStore;
use crate::Result;

/// Volatile [`StateStore`] backed by a map.
///
/// The default store for tests and for hosts that manage persistence
/// themselves. Everything is lost on drop.
#[derive(Debug, Default)]
pub struct InMemory {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemory {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemory {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
