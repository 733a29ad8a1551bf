use chrono::NaiveDate;
use thiserror::Error;

/// Failures of the backing leave store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("leave store could not be read or written: {0}")]
    Io(#[from] std::io::Error),

    #[error("leave store is corrupt: {0}")]
    Corrupt(String),

    #[error("leave store could not be encoded: {0}")]
    Encode(String),

    #[error("leave store lock was poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum LeaveError {
    /// Nothing to resolve. Callers usually treat this as an empty result.
    #[error("no leave duration was given")]
    EmptyDuration,

    #[error("could not understand the leave dates: {0}")]
    InvalidDuration(String),

    #[error("leave from {start} to {end} overlaps an existing leave from {existing_start} to {existing_end}")]
    OverlapConflict {
        start: NaiveDate,
        end: NaiveDate,
        existing_start: NaiveDate,
        existing_end: NaiveDate,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LeaveError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        LeaveError::InvalidDuration(msg.into())
    }

    /// Rejections the requester can fix by rephrasing. Everything else aborts the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LeaveError::EmptyDuration
                | LeaveError::InvalidDuration(_)
                | LeaveError::OverlapConflict { .. }
        )
    }
}
