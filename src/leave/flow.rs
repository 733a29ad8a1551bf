//! Request orchestration: normalize, resolve, check the ledger, classify, persist.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::error::LeaveError;
use crate::leave::classifier::classify_with_trace;
use crate::leave::date_parser::DateParser;
use crate::leave::normalizer::normalize;
use crate::leave::resolver::resolve;
use crate::model::action::{DURATION_SLOT, NluEntity};
use crate::model::leave_record::{LeaveCategory, LeaveRecord};
use crate::store::ledger::LeaveLedger;
use crate::store::usage::UsageProvider;

/// A duration that resolved to dates free of conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResolvedLeave {
    #[schema(example = "for 3 days")]
    pub phrase: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Posted { record: LeaveRecord, phrase: String },
    Declined,
    /// The duration was empty; nothing was resolved or stored.
    NothingToSubmit,
}

/// Prefer the longest string `duration_leave` entity of the latest message over the slot value.
pub fn pick_duration(slot_value: Option<&str>, entities: &[NluEntity]) -> Option<String> {
    entities
        .iter()
        .filter(|e| e.entity == DURATION_SLOT)
        .filter_map(|e| e.value.as_str())
        .max_by_key(|v| v.len())
        .or(slot_value)
        .map(str::to_string)
}

pub struct LeaveDesk {
    ledger: LeaveLedger,
    usage: Arc<dyn UsageProvider>,
    parser: Arc<dyn DateParser>,
}

impl LeaveDesk {
    pub fn new(
        ledger: LeaveLedger,
        usage: Arc<dyn UsageProvider>,
        parser: Arc<dyn DateParser>,
    ) -> Self {
        Self {
            ledger,
            usage,
            parser,
        }
    }

    pub fn ledger(&self) -> &LeaveLedger {
        &self.ledger
    }

    /// Validate a duration slot. `Ok(None)` when there is nothing to resolve.
    #[instrument(skip(self))]
    pub fn validate_duration(
        &self,
        sender_id: &str,
        raw: &str,
        today: NaiveDate,
    ) -> Result<Option<ResolvedLeave>, LeaveError> {
        match self.check(sender_id, raw, today) {
            Ok(resolved) => Ok(Some(resolved)),
            Err(LeaveError::EmptyDuration) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn check(&self, sender_id: &str, raw: &str, today: NaiveDate) -> Result<ResolvedLeave, LeaveError> {
        let phrase = normalize(raw);
        if phrase.is_empty() {
            return Err(LeaveError::EmptyDuration);
        }
        let (start, end) = resolve(&phrase, today, self.parser.as_ref())?;

        if let Some(existing) = self.ledger.find_overlap(sender_id, start, end)? {
            warn!(%start, %end, existing_start = %existing.start, existing_end = %existing.end, "overlapping leave rejected");
            return Err(LeaveError::OverlapConflict {
                start,
                end,
                existing_start: existing.start,
                existing_end: existing.end,
            });
        }
        Ok(ResolvedLeave { phrase, start, end })
    }

    /// Final submission. Only a confirmed, valid, conflict-free request writes to the ledger.
    #[instrument(skip(self, reason))]
    pub fn submit(
        &self,
        sender_id: &str,
        reason: &str,
        raw_duration: &str,
        confirmed: bool,
        today: NaiveDate,
    ) -> Result<SubmitOutcome, LeaveError> {
        if !confirmed {
            info!("leave request declined");
            return Ok(SubmitOutcome::Declined);
        }

        let resolved = match self.check(sender_id, raw_duration, today) {
            Ok(resolved) => resolved,
            Err(LeaveError::EmptyDuration) => return Ok(SubmitOutcome::NothingToSubmit),
            Err(e) => return Err(e),
        };

        let usage = self.usage.usage(sender_id)?;
        let trace = classify_with_trace(reason, resolved.start, resolved.end, &usage);
        info!(
            keyword = %trace.keyword,
            category = %trace.category,
            applied = ?trace.applied,
            "leave classified"
        );

        let record = LeaveRecord::new(resolved.start, resolved.end, reason, trace.category)?;
        self.ledger.append(sender_id, record.clone())?;
        Ok(SubmitOutcome::Posted {
            record,
            phrase: resolved.phrase,
        })
    }
}

pub fn posted_message(reason: &str, phrase: &str, category: LeaveCategory) -> String {
    format!("Your {category} leave for '{reason}' {phrase} has been posted!")
}

pub fn rejection_message(error: &LeaveError) -> String {
    match error {
        LeaveError::EmptyDuration => "Please tell me when you want to take leave.".to_string(),
        LeaveError::InvalidDuration(detail) => {
            format!("I couldn't work out those dates ({detail}). Could you rephrase them?")
        }
        LeaveError::OverlapConflict {
            existing_start,
            existing_end,
            ..
        } => format!(
            "You already have leave from {existing_start} to {existing_end}. Please choose different dates."
        ),
        LeaveError::Storage(e) => format!("Your leave could not be processed: {e}"),
    }
}
