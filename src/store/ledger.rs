use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{LeaveError, StorageError};
use crate::model::leave_record::LeaveRecord;

use super::backend::LedgerBackend;

/// Requester id to leaves, in submission order.
pub type LedgerMap = BTreeMap<String, Vec<LeaveRecord>>;

/// Approved leaves per requester.
///
/// Every call reads the store fresh and `append` rewrites all of it. There is
/// no lock around load-modify-save: two processes appending at once can lose
/// one of the writes. Swap in a locking backend if that matters.
#[derive(Clone)]
pub struct LeaveLedger {
    backend: Arc<dyn LedgerBackend>,
}

impl LeaveLedger {
    pub fn new(backend: Arc<dyn LedgerBackend>) -> Self {
        Self { backend }
    }

    fn load(&self) -> Result<LedgerMap, StorageError> {
        match self.backend.load()? {
            None => Ok(LedgerMap::new()),
            Some(text) if text.trim().is_empty() => {
                Err(StorageError::Corrupt("leave store is empty".to_string()))
            }
            Some(text) => {
                let ledger: LedgerMap = serde_json::from_str(&text)
                    .map_err(|e| StorageError::Corrupt(e.to_string()))?;
                if let Some((sender_id, r)) = ledger
                    .iter()
                    .flat_map(|(id, leaves)| leaves.iter().map(move |r| (id, r)))
                    .find(|(_, r)| r.start > r.end)
                {
                    return Err(StorageError::Corrupt(format!(
                        "leave of {sender_id} starts on {} after it ends on {}",
                        r.start, r.end
                    )));
                }
                Ok(ledger)
            }
        }
    }

    fn save(&self, ledger: &LedgerMap) -> Result<(), StorageError> {
        let text =
            serde_json::to_string_pretty(ledger).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.backend.save(&text)
    }

    pub fn records(&self, sender_id: &str) -> Result<Vec<LeaveRecord>, LeaveError> {
        let mut ledger = self.load()?;
        Ok(ledger.remove(sender_id).unwrap_or_default())
    }

    /// First stored leave intersecting `[start, end]`, bounds inclusive.
    pub fn find_overlap(
        &self,
        sender_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<LeaveRecord>, LeaveError> {
        let found = self
            .records(sender_id)?
            .into_iter()
            .find(|r| r.overlaps(start, end));
        debug!(sender_id, %start, %end, conflict = found.is_some(), "overlap check");
        Ok(found)
    }

    pub fn overlaps(
        &self,
        sender_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, LeaveError> {
        Ok(self.find_overlap(sender_id, start, end)?.is_some())
    }

    pub fn append(&self, sender_id: &str, record: LeaveRecord) -> Result<(), LeaveError> {
        let mut ledger = self.load()?;
        let leaves = ledger.entry(sender_id.to_string()).or_default();
        leaves.push(record);
        let count = leaves.len();
        self.save(&ledger)?;
        info!(sender_id, count, "leave recorded");
        Ok(())
    }
}
