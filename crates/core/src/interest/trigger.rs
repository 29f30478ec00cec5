//! Interest trigger and message-context types.

use serde::{Deserialize, Serialize};

use super::condition::{ConditionField, ConditionOperator};
use crate::lead::Temperature;
use crate::types::DbId;

/// A trigger loaded from the database, already parsed into typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestTrigger {
    pub id: DbId,
    pub name: String,
    /// Lower runs first.
    pub priority: i32,
    pub active: bool,
    pub condition_field: ConditionField,
    pub condition_operator: ConditionOperator,
    #[serde(default)]
    pub condition_value: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(flatten)]
    pub actions: TriggerActions,
}

/// What a matching trigger assigns to the lead. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerActions {
    #[serde(rename = "action_set_interest_id", default)]
    pub set_interest_id: Option<DbId>,
    #[serde(rename = "action_set_source_id", default)]
    pub set_source_id: Option<DbId>,
    #[serde(rename = "action_set_temperature", default)]
    pub set_temperature: Option<Temperature>,
    #[serde(rename = "action_set_status", default)]
    pub set_status: Option<String>,
}

impl TriggerActions {
    pub fn is_empty(&self) -> bool {
        self.set_interest_id.is_none()
            && self.set_source_id.is_none()
            && self.set_temperature.is_none()
            && self.set_status.is_none()
    }
}

/// The strings a trigger can inspect for one inbound conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    #[serde(default)]
    pub first_message: Option<String>,
    #[serde(default)]
    pub any_message: Option<String>,
    #[serde(default)]
    pub push_name: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
}

impl MessageContext {
    /// Select the value a trigger with `field` inspects.
    pub fn field(&self, field: ConditionField) -> Option<&str> {
        match field {
            ConditionField::FirstMessage => self.first_message.as_deref(),
            ConditionField::AnyMessage => self.any_message.as_deref(),
            ConditionField::PushName => self.push_name.as_deref(),
            ConditionField::SourceName => self.source_name.as_deref(),
        }
    }
}
