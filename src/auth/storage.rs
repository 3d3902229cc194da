//! Durable storage for the signed-in profile.
//!
//! DESIGN
//! ======
//! The store only ever holds one document: the current profile or nothing.
//! Native shells keep it as a JSON file; the browser client supplies its own
//! `localStorage` implementation of [`ProfileStorage`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::Profile;
use crate::error::StorageError;

/// Persistence backend for the signed-in profile.
pub trait ProfileStorage: Send + Sync {
    /// Read the stored profile, if any.
    fn load(&self) -> Result<Option<Profile>, StorageError>;
    /// Replace the stored profile.
    fn save(&self, profile: &Profile) -> Result<(), StorageError>;
    /// Remove the stored profile. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local storage. Used by tests and server-side rendering, where
/// nothing outlives the request.
#[derive(Debug, Default)]
pub struct MemoryProfileStorage {
    slot: Mutex<Option<Profile>>,
}

impl MemoryProfileStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profile(profile: Profile) -> Self {
        Self { slot: Mutex::new(Some(profile)) }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Profile>> {
        self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ProfileStorage for MemoryProfileStorage {
    fn load(&self) -> Result<Option<Profile>, StorageError> {
        Ok(self.slot().clone())
    }

    fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        *self.slot() = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON file storage. Writes go through a sibling temp file and a rename so
/// a crash mid-write never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct FileProfileStorage {
    path: PathBuf,
}

impl FileProfileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProfileStorage for FileProfileStorage {
    fn load(&self) -> Result<Option<Profile>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(profile)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "profile persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
