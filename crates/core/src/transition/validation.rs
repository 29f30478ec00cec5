//! Save-time checks for transition rules.

use super::rule::TemperatureTransitionRule;
use crate::error::CoreError;
use crate::lead::Temperature;

/// Smallest accepted timer.
pub const MIN_TIMER_MINUTES: i32 = 1;
/// Largest accepted timer (one year).
pub const MAX_TIMER_MINUTES: i32 = 525_600;

/// Validate a rule before it is created or updated.
pub fn validate_rule(rule: &TemperatureTransitionRule) -> Result<(), CoreError> {
    if rule.name.trim().is_empty() {
        return Err(CoreError::Validation("Rule name must not be empty".into()));
    }

    if !(MIN_TIMER_MINUTES..=MAX_TIMER_MINUTES).contains(&rule.timer_minutes) {
        return Err(CoreError::Validation(format!(
            "timer_minutes must be between {MIN_TIMER_MINUTES} and {MAX_TIMER_MINUTES}, got {}",
            rule.timer_minutes
        )));
    }

    for (field, value) in [
        ("from_temperature", rule.from_temperature),
        ("action_set_temperature", rule.action.set_temperature),
    ] {
        if let Some(t) = value {
            if !t.is_automatable() {
                return Err(CoreError::Validation(format!(
                    "{field} cannot be '{t}' in a transition rule"
                )));
            }
        }
    }

    // Substatus only exists under quente.
    if rule.from_substatus.is_some()
        && rule.from_temperature.is_some_and(|t| t != Temperature::Quente)
    {
        return Err(CoreError::Validation(
            "from_substatus requires from_temperature to be 'quente' or any".into(),
        ));
    }

    if rule.action.is_noop() {
        return Err(CoreError::Validation(
            "Rule must change the temperature or the substatus".into(),
        ));
    }

    if let Some(sub) = rule.action.set_substatus {
        if rule.action.clear_substatus {
            return Err(CoreError::Validation(
                "action_clear_substatus and action_set_substatus are mutually exclusive".into(),
            ));
        }
        let resulting = rule.action.set_temperature.or(rule.from_temperature);
        if resulting != Some(Temperature::Quente) {
            return Err(CoreError::Validation(format!(
                "action_set_substatus '{sub}' requires the lead to end up 'quente'"
            )));
        }
    }

    Ok(())
}
