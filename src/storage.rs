// Persistence backends: a single-slot get/set contract

use fs2::FileExt;
use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Single-slot key-value contract the store persists through
///
/// `load` returns the previously saved blob, or None when nothing was ever
/// saved. `save` replaces the slot wholesale.
pub trait StorageBackend {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, blob: &str) -> Result<(), StorageError>;
}

/// File-backed slot: one JSON document in one file
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(&self.path)?;
        debug!(path = ?self.path, bytes = blob.len(), "loaded slot");
        Ok(Some(blob))
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        // Acquire exclusive lock before writing
        file.lock_exclusive()?;

        file.write_all(blob.as_bytes())?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        debug!(path = ?self.path, bytes = blob.len(), "saved slot");
        Ok(())
    }
}

/// In-memory slot for tests and demos
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the store persisted. Single-threaded by construction, like the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with a blob, as if a previous session had saved it.
    pub fn with_blob(blob: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(blob.to_string()))),
        }
    }

    /// Current slot contents, if anything was ever saved
    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(blob.to_string());
        Ok(())
    }
}
