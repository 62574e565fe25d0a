use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the credential persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backing is inaccessible (missing config directory,
    /// permission failure). Callers may fall back to an in-memory
    /// credential for the rest of the session.
    #[error("credential storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence for the single opaque access credential.
///
/// `set` overwrites, `get` is a pure read, `clear` is idempotent. A store
/// holds at most one credential.
pub trait CredentialStore: Send + Sync {
    fn set(&self, credential: &str) -> Result<(), StorageError>;
    fn get(&self) -> Result<Option<String>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize)]
struct StoredCredential {
    api_key: String,
}

/// Durable store: one JSON file under the user config directory, shared
/// across runs of the client.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn open_default() -> Result<Self, StorageError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StorageError::Unavailable("no user config directory".to_string()))?;
        Ok(Self {
            path: config_dir.join("spend-client/credential.json"),
        })
    }

    /// Store backed by an explicit file, mainly for tests.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn set(&self, credential: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!("failed to create config directory: {}", e))
            })?;
        }

        let stored = StoredCredential {
            api_key: credential.to_string(),
        };
        let contents = serde_json::to_string_pretty(&stored).map_err(|e| {
            StorageError::Unavailable(format!("failed to serialize credential: {}", e))
        })?;

        std::fs::write(&self.path, contents).map_err(|e| {
            StorageError::Unavailable(format!("failed to write credential file: {}", e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions).map_err(|e| {
                StorageError::Unavailable(format!("failed to set file permissions: {}", e))
            })?;
        }

        Ok(())
    }

    fn get(&self) -> Result<Option<String>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Unavailable(format!(
                    "failed to read credential file: {}",
                    e
                )))
            }
        };

        // A malformed file reads as "no credential configured".
        Ok(serde_json::from_str::<StoredCredential>(&contents)
            .ok()
            .map(|stored| stored.api_key))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Unavailable(format!(
                "failed to delete credential file: {}",
                e
            ))),
        }
    }
}

/// Session-only store. Used when durable storage is unavailable, and as a
/// test double.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, credential: &str) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().unwrap_or_else(|poison| poison.into_inner());
        *slot = Some(credential.to_string());
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, StorageError> {
        let slot = self.slot.lock().unwrap_or_else(|poison| poison.into_inner());
        Ok(slot.clone())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().unwrap_or_else(|poison| poison.into_inner());
        *slot = None;
        Ok(())
    }
}
