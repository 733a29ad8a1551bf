use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::error::LeaveError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveCategory {
    Medical,
    Vacation,
    Parental,
    Personal,
    Sabbatical,
    Unpaid,
}

impl LeaveCategory {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Days or occasions allowed per accounting period before requests fall back to unpaid.
    /// Sabbatical and unpaid leave are not capped.
    pub fn quota(&self) -> Option<u32> {
        match self {
            LeaveCategory::Medical => Some(12),
            LeaveCategory::Vacation => Some(15),
            LeaveCategory::Parental => Some(30),
            LeaveCategory::Personal => Some(10),
            LeaveCategory::Sabbatical | LeaveCategory::Unpaid => None,
        }
    }
}

/// An approved leave as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "start": "2026-01-05",
    "end": "2026-01-07",
    "reason": "sick",
    "type": "medical"
}))]
pub struct LeaveRecord {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end: NaiveDate,
    #[schema(example = "sick")]
    pub reason: String,
    #[serde(rename = "type")]
    pub category: LeaveCategory,
}

impl LeaveRecord {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        reason: impl Into<String>,
        category: LeaveCategory,
    ) -> Result<Self, LeaveError> {
        if start > end {
            return Err(LeaveError::invalid(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self {
            start,
            end,
            reason: reason.into(),
            category,
        })
    }

    /// Inclusive day count.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Both bounds inclusive, so a leave starting the day another ends still overlaps it.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Days or occasions already consumed per category for one requester.
/// Keys are category names; a missing key counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryUsage(HashMap<String, u32>);

impl CategoryUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: LeaveCategory, used: u32) -> Self {
        self.0.insert(category.as_str().to_string(), used);
        self
    }

    pub fn get(&self, category: LeaveCategory) -> u32 {
        self.0.get(category.as_str()).copied().unwrap_or(0)
    }
}

impl From<HashMap<String, u32>> for CategoryUsage {
    fn from(map: HashMap<String, u32>) -> Self {
        Self(map)
    }
}
