//! In-memory storage backend
//!
//! Keeps the profile record in a shared string. Clones share the same cell,
//! so a test can hold one handle while the store owns another. Reads and
//! writes can be made to fail to exercise the store's fault handling.

use std::sync::{Arc, Mutex, MutexGuard};

use super::error::{StorageError, StorageResult};
use super::StorageBackend;

#[derive(Debug, Default)]
struct Cell {
    contents: Option<String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// Storage backend held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    cell: Arc<Mutex<Cell>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend preloaded with raw contents
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.lock().contents = Some(contents.into());
        backend
    }

    /// Raw stored contents
    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Make subsequent reads fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, Cell> {
        // A poisoned lock only means a test panicked mid-write; the data is still usable
        self.cell.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> StorageResult<Option<String>> {
        let cell = self.lock();
        if cell.fail_reads {
            return Err(StorageError::Unavailable("read refused".to_string()));
        }
        Ok(cell.contents.clone())
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        let mut cell = self.lock();
        if cell.fail_writes {
            return Err(StorageError::Unavailable("write refused".to_string()));
        }
        cell.contents = Some(contents.to_string());
        cell.writes += 1;
        Ok(())
    }
}
