//! Key-value persistence for the vault record and the recovery key copy.

use crate::error::{VaultError, VaultResult};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// String key-value storage the lifecycle persists through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> VaultResult<Option<String>>;

    /// Replaces the value for `key`. A reader sees the old value or the new
    /// one, never a partial write.
    fn set(&self, key: &str, value: &str) -> VaultResult<()>;

    /// Deletes `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> VaultResult<()>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> VaultResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| VaultError::Storage(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// One file per key under a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> VaultResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| VaultError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys map straight to file names, so only a conservative charset is
    /// accepted.
    fn path_for(&self, key: &str) -> VaultResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(VaultError::Storage(format!("invalid store key: {key:?}")));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        let path = self.path_for(key)?;
        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|e| VaultError::Storage(e.to_string()))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        tmp.persist(&path)
            .map_err(|e| VaultError::Storage(e.error.to_string()))?;
        debug!(key, bytes = value.len(), "store write");
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::Storage(e.to_string())),
        }
    }
}
