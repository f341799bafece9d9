//! File-backed profile persistence
//!
//! The whole profile collection lives in a single JSON file under the data
//! directory. Every write replaces the file using an atomic write (write to
//! temp file, then rename) so a crash never leaves a half-written record.
//!
//! Storage location: `~/.local/share/linkdance/linkdance-profiles.json`
//! (configurable via `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::StorageBackend;
use crate::config::Config;

/// Storage backend that keeps the profile record in a file
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend for an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a backend at the configured profile record location
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.profiles_path())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the record exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_read_io(e, self.path.clone())),
        }
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        atomic_write(&self.path, contents.as_bytes())?;
        debug!("Wrote {} bytes to {:?}", contents.len(), self.path);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("profiles.json"));

        assert!(!backend.exists());
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("profiles.json"));

        backend.write("[]").unwrap();
        assert!(backend.exists());
        assert_eq!(backend.read().unwrap().as_deref(), Some("[]"));

        backend.write(r#"[{"id":"a"}]"#).unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some(r#"[{"id":"a"}]"#));
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.json");

        atomic_write(&nested_path, b"test data").unwrap();

        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
        // Temp file is renamed away
        assert!(!nested_path.with_extension("tmp").exists());
    }

    #[test]
    fn test_from_config_uses_well_known_name() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let backend = FileBackend::from_config(&config);
        assert!(backend.path().ends_with("linkdance-profiles.json"));
    }
}
