//! Local key-value store.
//!
//! DESIGN
//! ======
//! Boards persist as two string values: the JSON board list under
//! [`BOARDS_KEY`] and the active board id under [`ACTIVE_BOARD_KEY`]. The
//! store is deliberately tiny (`get`/`set`/`remove` of whole values) so the
//! same persistence code runs against a directory on disk or an in-memory
//! map in tests.
//!
//! ERROR HANDLING
//! ==============
//! File writes go to a temporary sibling first and are renamed into place,
//! so a crash mid-write leaves the previous value intact.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "kv_test.rs"]
mod kv_test;

/// Key of the JSON board list.
pub const BOARDS_KEY: &str = "moodboard:boards";

/// Key of the active board id.
pub const ACTIVE_BOARD_KEY: &str = "moodboard:active-board";

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("key-value io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("key-value store lock poisoned")]
    Poisoned,
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

impl ErrorCode for KvError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_KV_IO",
            Self::Poisoned => "E_KV_POISONED",
            Self::InvalidKey(_) => "E_KV_INVALID_KEY",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Whole-value string storage.
pub trait KvStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] when the backing storage fails.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] when the backing storage fails.
    fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] when the backing storage fails.
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

// =============================================================================
// FILE STORE
// =============================================================================

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open (creating if needed) the store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Io`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, KvError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. `:` becomes `.`; anything outside
    /// `[A-Za-z0-9._-]` is rejected.
    fn path_for(&self, key: &str) -> Result<PathBuf, KvError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '.' | '_' | '-'));
        if !valid {
            return Err(KvError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{}.kv", key.replace(':', "."))))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("kv.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let values = self.values.lock().map_err(|_| KvError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut values = self.values.lock().map_err(|_| KvError::Poisoned)?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut values = self.values.lock().map_err(|_| KvError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}
