//! Temperature transition rule entity model and DTOs.

use odonto_core::error::CoreError;
use odonto_core::lead::{
    parse_optional_substatus, parse_optional_temperature, HotSubstatus, Temperature,
};
use odonto_core::settings::AutomationSettings;
use odonto_core::transition::rule::{TemperatureTransitionRule, TransitionAction, TriggerEvent};
use odonto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::double_option;

/// A row from the `temperature_transition_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransitionRuleRow {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub priority: i32,
    pub is_active: bool,
    pub trigger_event: String,
    pub from_temperature: Option<String>,
    pub from_substatus: Option<String>,
    pub timer_minutes: i32,
    pub action_set_temperature: Option<String>,
    pub action_clear_substatus: bool,
    pub action_set_substatus: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TransitionRuleRow {
    /// Parse the text columns into the typed rule the tester works on.
    pub fn into_core(self) -> Result<TemperatureTransitionRule, CoreError> {
        Ok(TemperatureTransitionRule {
            id: self.id,
            name: self.name,
            active: self.is_active,
            priority: self.priority,
            trigger_event: TriggerEvent::from_str(&self.trigger_event)?,
            from_temperature: parse_optional_temperature(self.from_temperature.as_deref())?,
            from_substatus: parse_optional_substatus(self.from_substatus.as_deref())?,
            timer_minutes: self.timer_minutes,
            action: TransitionAction {
                set_temperature: parse_optional_temperature(
                    self.action_set_temperature.as_deref(),
                )?,
                clear_substatus: self.action_clear_substatus,
                set_substatus: parse_optional_substatus(self.action_set_substatus.as_deref())?,
            },
        })
    }
}

/// DTO for creating a new transition rule.
///
/// `timer_minutes` falls back to the organization default for the event;
/// `priority` falls back to "after the current last".
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransitionRule {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub trigger_event: TriggerEvent,
    pub from_temperature: Option<Temperature>,
    pub from_substatus: Option<HotSubstatus>,
    #[validate(range(min = 1))]
    pub timer_minutes: Option<i32>,
    pub action_set_temperature: Option<Temperature>,
    pub action_clear_substatus: Option<bool>,
    pub action_set_substatus: Option<HotSubstatus>,
}

impl CreateTransitionRule {
    /// Typed view of the new rule with defaults resolved.
    pub fn to_core(&self, settings: &AutomationSettings) -> TemperatureTransitionRule {
        TemperatureTransitionRule {
            id: 0,
            name: self.name.clone(),
            active: self.is_active.unwrap_or(true),
            priority: self.priority.unwrap_or(0),
            trigger_event: self.trigger_event,
            from_temperature: self.from_temperature,
            from_substatus: self.from_substatus,
            timer_minutes: self
                .timer_minutes
                .unwrap_or_else(|| settings.default_timer_for(self.trigger_event)),
            action: TransitionAction {
                set_temperature: self.action_set_temperature,
                clear_substatus: self.action_clear_substatus.unwrap_or(false),
                set_substatus: self.action_set_substatus,
            },
        }
    }
}

/// DTO for updating a transition rule. All fields optional; the nullable
/// filters and actions accept an explicit `null` (back to "any" / unset).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTransitionRule {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub trigger_event: Option<TriggerEvent>,
    #[serde(default, deserialize_with = "double_option")]
    pub from_temperature: Option<Option<Temperature>>,
    #[serde(default, deserialize_with = "double_option")]
    pub from_substatus: Option<Option<HotSubstatus>>,
    #[validate(range(min = 1))]
    pub timer_minutes: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub action_set_temperature: Option<Option<Temperature>>,
    pub action_clear_substatus: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub action_set_substatus: Option<Option<HotSubstatus>>,
}

impl UpdateTransitionRule {
    /// Merge the patch into an existing rule.
    pub fn apply_to(&self, rule: &mut TemperatureTransitionRule) {
        if let Some(name) = &self.name {
            rule.name = name.clone();
        }
        if let Some(priority) = self.priority {
            rule.priority = priority;
        }
        if let Some(active) = self.is_active {
            rule.active = active;
        }
        if let Some(event) = self.trigger_event {
            rule.trigger_event = event;
        }
        if let Some(v) = self.from_temperature {
            rule.from_temperature = v;
        }
        if let Some(v) = self.from_substatus {
            rule.from_substatus = v;
        }
        if let Some(minutes) = self.timer_minutes {
            rule.timer_minutes = minutes;
        }
        if let Some(v) = self.action_set_temperature {
            rule.action.set_temperature = v;
        }
        if let Some(clear) = self.action_clear_substatus {
            rule.action.clear_substatus = clear;
        }
        if let Some(v) = self.action_set_substatus {
            rule.action.set_substatus = v;
        }
    }
}
