//! Save-time checks for interest triggers.
//!
//! The evaluator tolerates anything already stored; these checks only keep
//! new or edited triggers sensible.

use regex::Regex;

use super::condition::ConditionOperator;
use super::trigger::InterestTrigger;
use crate::error::CoreError;

/// Upper bound on `condition_value` length.
pub const MAX_CONDITION_VALUE_LEN: usize = 500;

/// Validate a trigger before it is created or updated.
pub fn validate_trigger(trigger: &InterestTrigger) -> Result<(), CoreError> {
    if trigger.name.trim().is_empty() {
        return Err(CoreError::Validation("Trigger name must not be empty".into()));
    }

    let op = trigger.condition_operator;
    if op.uses_value() && trigger.condition_value.is_empty() {
        return Err(CoreError::Validation(format!(
            "condition_value is required for operator '{op}'"
        )));
    }
    if trigger.condition_value.len() > MAX_CONDITION_VALUE_LEN {
        return Err(CoreError::Validation(format!(
            "condition_value must be at most {MAX_CONDITION_VALUE_LEN} characters"
        )));
    }
    if op == ConditionOperator::Regex {
        if let Err(e) = Regex::new(&trigger.condition_value) {
            return Err(CoreError::Validation(format!(
                "condition_value is not a valid regular expression: {e}"
            )));
        }
    }

    if trigger.actions.is_empty() {
        return Err(CoreError::Validation(
            "Trigger must set at least one of interest, source, temperature or status".into(),
        ));
    }
    if let Some(t) = trigger.actions.set_temperature {
        if !t.is_automatable() {
            return Err(CoreError::Validation(format!(
                "Triggers cannot set temperature '{t}'"
            )));
        }
    }
    if matches!(&trigger.actions.set_status, Some(s) if s.trim().is_empty()) {
        return Err(CoreError::Validation(
            "action_set_status must not be blank".into(),
        ));
    }

    Ok(())
}
