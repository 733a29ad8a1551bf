use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{LeaveError, StorageError};
use crate::model::leave_record::CategoryUsage;

/// Per-category consumption for a requester, from an accounting system.
pub trait UsageProvider: Send + Sync {
    fn usage(&self, sender_id: &str) -> Result<CategoryUsage, LeaveError>;
}

/// Nothing consumed for anyone. Used when no accounting source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUsage;

impl UsageProvider for NoUsage {
    fn usage(&self, _sender_id: &str) -> Result<CategoryUsage, LeaveError> {
        Ok(CategoryUsage::new())
    }
}

/// Fixed usage per requester.
#[derive(Debug, Clone, Default)]
pub struct StaticUsage {
    by_sender: HashMap<String, CategoryUsage>,
}

impl StaticUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sender_id: &str, usage: CategoryUsage) -> Self {
        self.by_sender.insert(sender_id.to_string(), usage);
        self
    }
}

impl UsageProvider for StaticUsage {
    fn usage(&self, sender_id: &str) -> Result<CategoryUsage, LeaveError> {
        Ok(self.by_sender.get(sender_id).cloned().unwrap_or_default())
    }
}

/// JSON export of the accounting system: `{"<sender>": {"<category>": <count>}}`.
/// Read on every call so updates show up without a restart.
#[derive(Debug, Clone)]
pub struct FileUsage {
    path: PathBuf,
}

impl FileUsage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UsageProvider for FileUsage {
    fn usage(&self, sender_id: &str) -> Result<CategoryUsage, LeaveError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CategoryUsage::new()),
            Err(e) => return Err(StorageError::Io(e).into()),
        };
        let mut all: HashMap<String, CategoryUsage> = serde_json::from_str(&text)
            .map_err(|e| StorageError::Corrupt(format!("usage file: {e}")))?;
        Ok(all.remove(sender_id).unwrap_or_default())
    }
}
