//! Profile store
//!
//! The `ProfileStore` maps profile IDs to profiles on top of a
//! [`StorageBackend`]. The whole collection is read on every call and
//! rewritten wholesale on every mutation; there are no partial writes.
//!
//! ## Two layers
//!
//! - `try_*` methods return [`StorageResult`] so faults stay observable.
//! - The plain methods keep the local-tool contract: a fault is logged and
//!   reads degrade to empty, writes are dropped. Callers of these cannot tell
//!   a saved profile from a lost one.
//!
//! ## Usage
//!
//! ```ignore
//! let store = ProfileStore::open()?;
//!
//! store.save_profile(&profile);
//! let profiles = store.list_profiles();
//! ```
//!
//! Concurrent writers (two processes on the same file) are not coordinated:
//! the last writer wins.

use anyhow::{Context, Result};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::models::{now_millis, Profile};
use crate::storage::{FileBackend, StorageBackend, StorageError, StorageResult};

/// Keyed collection of profiles over a storage backend
pub struct ProfileStore<B = FileBackend> {
    backend: B,
}

impl ProfileStore<FileBackend> {
    /// Open the file-backed store at the configured location
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config))
    }

    /// Open the file-backed store for a specific configuration
    pub fn open_with_config(config: &Config) -> Self {
        Self::new(FileBackend::from_config(config))
    }
}

impl<B: StorageBackend> ProfileStore<B> {
    /// Create a store over the given backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ==================== Explicit results ====================

    /// All stored profiles in persisted order
    ///
    /// An absent or blank record is an empty collection, not an error.
    pub fn try_list_profiles(&self) -> StorageResult<Vec<Profile>> {
        match self.backend.read()? {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(StorageError::Corrupt)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Profile with the given ID, if stored
    pub fn try_get_profile(&self, id: &str) -> StorageResult<Option<Profile>> {
        Ok(self
            .try_list_profiles()?
            .into_iter()
            .find(|p| p.id == id))
    }

    /// Upsert a profile by ID and return the stored copy
    ///
    /// - Existing ID: the entry is replaced, `createdAt` is kept from the stored
    ///   entry and `updatedAt` is set to now (never earlier than before).
    /// - New ID: `createdAt` and `updatedAt` are both stamped now, overwriting
    ///   whatever `createdAt` the caller supplied.
    ///
    /// Duplicate social platforms are collapsed before writing.
    pub fn try_save_profile(&self, profile: &Profile) -> StorageResult<Profile> {
        let mut profiles = self.load_for_write()?;
        let now = now_millis();

        let mut stored = profile.clone();
        stored.normalize_social_links();

        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => {
                stored.created_at = existing.created_at;
                stored.updated_at = now.max(existing.updated_at);
                *existing = stored.clone();
                debug!("Updated profile {}", stored.id);
            }
            None => {
                stored.created_at = now;
                stored.updated_at = now;
                profiles.push(stored.clone());
                debug!("Created profile {}", stored.id);
            }
        }

        self.write_all(&profiles)?;
        Ok(stored)
    }

    /// Remove a profile by ID
    ///
    /// Returns whether an entry was removed. A missing ID is not an error and
    /// leaves the record untouched.
    pub fn try_delete_profile(&self, id: &str) -> StorageResult<bool> {
        let mut profiles = self.load_for_write()?;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);

        if profiles.len() == before {
            debug!("Delete of unknown profile {} ignored", id);
            return Ok(false);
        }

        self.write_all(&profiles)?;
        debug!("Deleted profile {}", id);
        Ok(true)
    }

    // ==================== Degrading wrappers ====================

    /// All stored profiles; empty if the record is absent, unreadable or corrupted
    pub fn list_profiles(&self) -> Vec<Profile> {
        self.try_list_profiles().unwrap_or_else(|e| {
            error!("Error getting profiles from storage: {}", e);
            Vec::new()
        })
    }

    /// Profile with the given ID; `None` if absent or unreadable
    pub fn get_profile(&self, id: &str) -> Option<Profile> {
        self.list_profiles().into_iter().find(|p| p.id == id)
    }

    /// Upsert a profile; a storage fault is logged and the write is lost
    pub fn save_profile(&self, profile: &Profile) {
        if let Err(e) = self.try_save_profile(profile) {
            error!("Error saving profile {} to storage: {}", profile.id, e);
        }
    }

    /// Remove a profile; a storage fault is logged and the delete is lost
    pub fn delete_profile(&self, id: &str) {
        if let Err(e) = self.try_delete_profile(id) {
            error!("Error deleting profile {} from storage: {}", id, e);
        }
    }

    /// Number of stored profiles
    pub fn profile_count(&self) -> usize {
        self.list_profiles().len()
    }

    // ==================== Internal ====================

    /// Current collection as the base for a rewrite
    ///
    /// A corrupted record is treated as empty and replaced by the next write;
    /// an unreadable medium aborts the write.
    fn load_for_write(&self) -> StorageResult<Vec<Profile>> {
        match self.try_list_profiles() {
            Err(StorageError::Corrupt(e)) => {
                warn!("Discarding corrupted profile record: {}", e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn write_all(&self, profiles: &[Profile]) -> StorageResult<()> {
        let text = serde_json::to_string(profiles).map_err(StorageError::Serialize)?;
        self.backend.write(&text)
    }
}
