use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::leave::flow::ResolvedLeave;

/// Slot names shared with the dialogue collaborator.
pub const REASON_SLOT: &str = "reason_leave";
pub const DURATION_SLOT: &str = "duration_leave";
pub const LEAVE_FORM: &str = "leave_form";
pub const CONTINUE_RESPONSE: &str = "utter_continue_convo";

/// An entity extracted by the NLU collaborator from the latest message.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NluEntity {
    #[schema(example = "duration_leave")]
    pub entity: String,
    /// Non-string values are ignored when picking the duration.
    #[schema(example = "5 march to 7 march", value_type = Object)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateDuration {
    #[schema(example = "u1")]
    pub sender_id: String,
    /// Slot value as filled by the collaborator.
    #[schema(example = "3 days")]
    pub duration_leave: Option<String>,
    #[serde(default)]
    pub entities: Vec<NluEntity>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitLeave {
    #[schema(example = "u1")]
    pub sender_id: String,
    #[schema(example = "sick")]
    pub reason_leave: Option<String>,
    #[schema(example = "3 days")]
    pub duration_leave: Option<String>,
    /// Whether the requester confirmed the summary.
    #[schema(example = true)]
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BotMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Name of a canned response the collaborator should utter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ActionEvent {
    Slot { name: String, value: Option<String> },
    /// Re-open a form so the collaborator collects the slots again.
    ActiveLoop { name: String },
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Validated slot values; `null` asks the collaborator to request the slot again.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedLeave>,
    pub messages: Vec<BotMessage>,
    pub events: Vec<ActionEvent>,
}

impl ActionResponse {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.messages.push(BotMessage {
            text: Some(text.into()),
            response: None,
        });
        self
    }

    pub fn response(mut self, name: &str) -> Self {
        self.messages.push(BotMessage {
            text: None,
            response: Some(name.to_string()),
        });
        self
    }

    pub fn slot(mut self, name: &str, value: Option<String>) -> Self {
        self.slots.insert(name.to_string(), value);
        self
    }

    pub fn set_slot(mut self, name: &str, value: Option<String>) -> Self {
        self.events.push(ActionEvent::Slot {
            name: name.to_string(),
            value,
        });
        self
    }

    pub fn reopen(mut self, form: &str) -> Self {
        self.events.push(ActionEvent::ActiveLoop {
            name: form.to_string(),
        });
        self
    }

    /// Reset the transient leave slots.
    pub fn clear_leave_slots(self) -> Self {
        self.set_slot(REASON_SLOT, None).set_slot(DURATION_SLOT, None)
    }
}
