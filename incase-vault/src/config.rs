//! Vault configuration.

use crate::error::{VaultError, VaultResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for a file-backed vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Directory holding one file per persisted key.
    pub storage_dir: PathBuf,

    /// Store key of the encrypted vault record.
    pub vault_key: String,

    /// Store key of the plaintext recovery key copy.
    pub recovery_key_key: String,

    /// Keep a plaintext copy of the recovery key next to the record so a
    /// passphrase unlock can re-wrap the recovery slot on every save.
    pub persist_recovery_key: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            storage_dir: Self::default_storage_dir(),
            vault_key: "incase_vault".to_string(),
            recovery_key_key: "incase_recovery_key".to_string(),
            persist_recovery_key: true,
        }
    }
}

impl VaultConfig {
    /// Platform local data directory joined with `incase`.
    pub fn default_storage_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("incase")
    }

    /// Default config rooted at `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> VaultResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|e| VaultError::Storage(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| VaultError::Storage(format!("invalid config: {e}")))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> VaultResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VaultError::Storage(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| VaultError::Storage(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| VaultError::Storage(e.to_string()))
    }
}
