//! Interest trigger entity model and DTOs.

use odonto_core::error::CoreError;
use odonto_core::interest::condition::{ConditionField, ConditionOperator};
use odonto_core::interest::trigger::{InterestTrigger, TriggerActions};
use odonto_core::lead::{parse_optional_temperature, Temperature};
use odonto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::double_option;

/// A row from the `interest_triggers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterestTriggerRow {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub priority: i32,
    pub is_active: bool,
    pub condition_field: String,
    pub condition_operator: String,
    pub condition_value: String,
    pub case_sensitive: bool,
    pub action_set_interest_id: Option<DbId>,
    pub action_set_source_id: Option<DbId>,
    pub action_set_temperature: Option<String>,
    pub action_set_status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InterestTriggerRow {
    /// Parse the text columns into the typed trigger the matcher works on.
    pub fn into_core(self) -> Result<InterestTrigger, CoreError> {
        Ok(InterestTrigger {
            id: self.id,
            name: self.name,
            priority: self.priority,
            active: self.is_active,
            condition_field: ConditionField::from_str(&self.condition_field)?,
            condition_operator: ConditionOperator::from_str(&self.condition_operator)?,
            condition_value: self.condition_value,
            case_sensitive: self.case_sensitive,
            actions: TriggerActions {
                set_interest_id: self.action_set_interest_id,
                set_source_id: self.action_set_source_id,
                set_temperature: parse_optional_temperature(
                    self.action_set_temperature.as_deref(),
                )?,
                set_status: self.action_set_status,
            },
        })
    }
}

/// DTO for creating a new interest trigger.
///
/// When `priority` is omitted the trigger is appended after the current last.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInterestTrigger {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub condition_field: ConditionField,
    pub condition_operator: ConditionOperator,
    #[serde(default)]
    pub condition_value: String,
    pub case_sensitive: Option<bool>,
    pub action_set_interest_id: Option<DbId>,
    pub action_set_source_id: Option<DbId>,
    pub action_set_temperature: Option<Temperature>,
    #[validate(length(max = 80))]
    pub action_set_status: Option<String>,
}

impl CreateInterestTrigger {
    /// Typed view of the new trigger, used for save-time validation.
    pub fn to_core(&self) -> InterestTrigger {
        InterestTrigger {
            id: 0,
            name: self.name.clone(),
            priority: self.priority.unwrap_or(0),
            active: self.is_active.unwrap_or(true),
            condition_field: self.condition_field,
            condition_operator: self.condition_operator,
            condition_value: self.condition_value.clone(),
            case_sensitive: self.case_sensitive.unwrap_or(false),
            actions: TriggerActions {
                set_interest_id: self.action_set_interest_id,
                set_source_id: self.action_set_source_id,
                set_temperature: self.action_set_temperature,
                set_status: self.action_set_status.clone(),
            },
        }
    }
}

/// DTO for updating an interest trigger. All fields optional; nullable
/// action columns accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInterestTrigger {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub condition_field: Option<ConditionField>,
    pub condition_operator: Option<ConditionOperator>,
    pub condition_value: Option<String>,
    pub case_sensitive: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub action_set_interest_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub action_set_source_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub action_set_temperature: Option<Option<Temperature>>,
    #[serde(default, deserialize_with = "double_option")]
    pub action_set_status: Option<Option<String>>,
}

impl UpdateInterestTrigger {
    /// Merge the patch into an existing trigger.
    pub fn apply_to(&self, trigger: &mut InterestTrigger) {
        if let Some(name) = &self.name {
            trigger.name = name.clone();
        }
        if let Some(priority) = self.priority {
            trigger.priority = priority;
        }
        if let Some(active) = self.is_active {
            trigger.active = active;
        }
        if let Some(field) = self.condition_field {
            trigger.condition_field = field;
        }
        if let Some(op) = self.condition_operator {
            trigger.condition_operator = op;
        }
        if let Some(value) = &self.condition_value {
            trigger.condition_value = value.clone();
        }
        if let Some(cs) = self.case_sensitive {
            trigger.case_sensitive = cs;
        }
        if let Some(v) = self.action_set_interest_id {
            trigger.actions.set_interest_id = v;
        }
        if let Some(v) = self.action_set_source_id {
            trigger.actions.set_source_id = v;
        }
        if let Some(v) = self.action_set_temperature {
            trigger.actions.set_temperature = v;
        }
        if let Some(v) = &self.action_set_status {
            trigger.actions.set_status = v.clone();
        }
    }
}

/// Body of a reorder request: every active id, in the new order.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<DbId>,
}
