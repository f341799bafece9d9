//! Storage layer
//!
//! The persisted layout is a single text record holding the JSON array of all
//! profiles. A backend only knows how to read and replace that record; the
//! `ProfileStore` owns parsing, upserts and deletes.
//!
//! ## Backends
//!
//! - **FileBackend**: the record lives in a file under the data directory
//! - **MemoryBackend**: the record lives in memory (tests, previews)

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryBackend;
pub use persistence::FileBackend;

/// Read/replace access to the persisted profile record
pub trait StorageBackend {
    /// Read the whole record; `None` when nothing has been written yet
    fn read(&self) -> StorageResult<Option<String>>;

    /// Replace the whole record
    fn write(&self, contents: &str) -> StorageResult<()>;
}
