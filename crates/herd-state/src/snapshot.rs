//! JSON snapshots of an in-memory world state.
//!
//! Values are opaque bytes, so they are stored hex-encoded. Writes go through
//! a temporary file in the target directory and are renamed into place.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};
use crate::memory::InMemoryWorldState;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a world state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: u32,
    /// Key to hex-encoded value.
    pub entries: BTreeMap<String, String>,
}

impl StateSnapshot {
    pub fn from_entries(entries: &BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            entries: entries
                .iter()
                .map(|(k, v)| (k.clone(), hex::encode(v)))
                .collect(),
        }
    }

    pub fn into_entries(self) -> StateResult<BTreeMap<String, Vec<u8>>> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StateError::Snapshot(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }
        self.entries
            .into_iter()
            .map(|(k, v)| {
                let bytes = hex::decode(&v)
                    .map_err(|e| StateError::Snapshot(format!("value for {k}: {e}")))?;
                Ok((k, bytes))
            })
            .collect()
    }
}

impl InMemoryWorldState {
    /// Load a state from `path`. A missing file yields an empty state.
    pub fn load(path: &Path) -> StateResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no snapshot found, starting empty");
            return Ok(Self::new());
        }
        let data = std::fs::read(path)?;
        let snapshot: StateSnapshot = serde_json::from_slice(&data)
            .map_err(|e| StateError::Snapshot(e.to_string()))?;
        let entries = snapshot.into_entries()?;
        tracing::debug!(path = %path.display(), keys = entries.len(), "loaded snapshot");
        Ok(Self::from_entries(entries))
    }

    /// Persist the current state to `path`, replacing it atomically.
    pub fn save(&self, path: &Path) -> StateResult<()> {
        let snapshot = StateSnapshot::from_entries(&self.raw_entries()?);
        let data = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StateError::Snapshot(e.to_string()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StateError::Io(e.error))?;
        tracing::debug!(path = %path.display(), keys = snapshot.entries.len(), "saved snapshot");
        Ok(())
    }
}
