//! File-backed state store.
//!
//! This module persists the key-value state as a small, versioned,
//! pretty-printed JSON file, written through on every change. It is the
//! store the CLI uses so sessions survive between invocations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{StateStore, StoreError};
use crate::Result;

/// The current state file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const STATE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// On-disk shape of the state file.
#[derive(Serialize, Deserialize)]
struct StateFile {
    /// File format version for compatibility checking
    #[serde(rename = "_v", default, skip_serializing_if = "is_v0")]
    version: u8,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Write-through [`StateStore`] backed by a JSON file.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFile {
    /// Open a state file, creating an empty store when the file is missing.
    ///
    /// A file written by an unknown format version is refused rather than
    /// silently reset, so a downgrade cannot destroy a newer file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => {
                let state: StateFile = serde_json::from_str(&json)
                    .map_err(|e| StoreError::Deserialize { source: e })?;
                if state.version != STATE_VERSION {
                    return Err(StoreError::UnsupportedVersion {
                        found: state.version,
                        expected: STATE_VERSION,
                    }
                    .into());
                }
                state.entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(StoreError::FileIo { source: e }.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let state = StateFile {
            version: STATE_VERSION,
            entries: entries.clone(),
        };
        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| StoreError::Serialize { source: e })?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::FileIo { source: e }.into())
    }
}

impl StateStore for JsonFile {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
