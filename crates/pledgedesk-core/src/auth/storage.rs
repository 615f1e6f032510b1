//! Durable key-value storage backing the session store.
//!
//! The on-disk format is a single JSON object of string values, stored in
//! `session.json` under the data directory.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Key-value storage that survives process restarts.
///
/// Access is read-modify-write without locking across processes; a single
/// process owns its session file.
pub trait DurableStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage in the data directory
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read session file")?;

        match serde_json::from_str(&contents) {
            Ok(map) => Ok(map),
            Err(e) => {
                // A damaged file holds no usable session; start over
                warn!(path = ?self.path, error = %e, "Session file is corrupt, ignoring it");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if map.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).context("Failed to remove session file")?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Process-local storage, used by tests and hosts without a data directory.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
