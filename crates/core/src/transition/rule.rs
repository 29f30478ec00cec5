//! Transition rule types.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lead::{HotSubstatus, Temperature};
use crate::types::DbId;

/// The lead event a transition rule is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    InactivityTimer,
    SubstatusTimeout,
    NoResponse,
}

impl TriggerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InactivityTimer => "inactivity_timer",
            Self::SubstatusTimeout => "substatus_timeout",
            Self::NoResponse => "no_response",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "inactivity_timer" => Ok(Self::InactivityTimer),
            "substatus_timeout" => Ok(Self::SubstatusTimeout),
            "no_response" => Ok(Self::NoResponse),
            _ => Err(CoreError::Validation(format!(
                "Invalid trigger_event: '{s}'. Must be one of: inactivity_timer, \
                 substatus_timeout, no_response"
            ))),
        }
    }
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a matched rule does to the lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionAction {
    #[serde(rename = "action_set_temperature", default)]
    pub set_temperature: Option<Temperature>,
    #[serde(rename = "action_clear_substatus", default)]
    pub clear_substatus: bool,
    #[serde(rename = "action_set_substatus", default)]
    pub set_substatus: Option<HotSubstatus>,
}

impl TransitionAction {
    pub fn is_noop(&self) -> bool {
        self.set_temperature.is_none() && !self.clear_substatus && self.set_substatus.is_none()
    }
}

/// A temperature transition rule. `None` filters match any lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureTransitionRule {
    pub id: DbId,
    pub name: String,
    pub active: bool,
    pub priority: i32,
    pub trigger_event: TriggerEvent,
    #[serde(default)]
    pub from_temperature: Option<Temperature>,
    #[serde(default)]
    pub from_substatus: Option<HotSubstatus>,
    pub timer_minutes: i32,
    #[serde(flatten)]
    pub action: TransitionAction,
}
