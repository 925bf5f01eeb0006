//! Persisted credential storage.
//!
//! The persisted document mirrors what a browser client keeps in local
//! storage: `accessToken`, `refreshToken` and `user`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::UserProfile;

/// Errors from reading or writing a token store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Token store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// What survives a restart.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl std::fmt::Debug for PersistedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedSession")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

/// Backing storage for a [`Session`](super::Session).
pub trait TokenStore: Send + Sync {
    /// Read the persisted session. A store with nothing in it yields the default.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn load(&self) -> Result<PersistedSession, StoreError>;

    /// Replace the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn save(&self, session: &PersistedSession) -> Result<(), StoreError>;

    /// Remove everything.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be cleared.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local store, used in tests and by callers that never persist.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<Mutex<PersistedSession>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a session.
    #[must_use]
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Current contents.
    #[must_use]
    pub fn snapshot(&self) -> PersistedSession {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<PersistedSession, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = PersistedSession::default();
        Ok(())
    }
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<PersistedSession, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                Ok(PersistedSession::default())
            }
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PersistedSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
