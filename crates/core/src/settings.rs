//! Organization-level automation defaults.
//!
//! Passed explicitly to the code that needs them; nothing here reads the
//! environment.

use serde::{Deserialize, Serialize};

use crate::transition::rule::TriggerEvent;

/// Default inactivity timer: one day.
pub const DEFAULT_INACTIVITY_MINUTES: i32 = 1440;
/// Default time a lead may sit in a hot substatus.
pub const DEFAULT_SUBSTATUS_TIMEOUT_MINUTES: i32 = 60;
/// Default wait for a reply before a lead counts as unresponsive.
pub const DEFAULT_NO_RESPONSE_MINUTES: i32 = 240;

/// Default timers used when a rule is created without `timer_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationSettings {
    pub default_inactivity_minutes: i32,
    pub default_substatus_timeout_minutes: i32,
    pub default_no_response_minutes: i32,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            default_inactivity_minutes: DEFAULT_INACTIVITY_MINUTES,
            default_substatus_timeout_minutes: DEFAULT_SUBSTATUS_TIMEOUT_MINUTES,
            default_no_response_minutes: DEFAULT_NO_RESPONSE_MINUTES,
        }
    }
}

impl AutomationSettings {
    pub fn default_timer_for(&self, event: TriggerEvent) -> i32 {
        match event {
            TriggerEvent::InactivityTimer => self.default_inactivity_minutes,
            TriggerEvent::SubstatusTimeout => self.default_substatus_timeout_minutes,
            TriggerEvent::NoResponse => self.default_no_response_minutes,
        }
    }
}
