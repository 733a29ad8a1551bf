use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::error::StorageError;

/// Raw storage for the serialized leave store.
///
/// The ledger loads and saves the whole document through this trait, so a
/// locking or transactional backend can replace these without touching callers.
pub trait LedgerBackend: Send + Sync {
    /// `None` when nothing has been written yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    fn save(&self, contents: &str) -> Result<(), StorageError>;
}

/// A single JSON file, replaced wholesale on every save.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerBackend for FileBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn save(&self, contents: &str) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        // Readers see the old file or the new one, never a partial write.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

/// In-process store, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw text, which need not be valid.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }
}

impl LedgerBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let guard = self.contents.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, contents: &str) -> Result<(), StorageError> {
        let mut guard = self.contents.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = Some(contents.to_string());
        Ok(())
    }
}
