//! Rule tester. Evaluates a rule against a hypothetical lead without mutating it.

use serde::{Deserialize, Serialize};

use super::rule::{TemperatureTransitionRule, TransitionAction};
use crate::lead::{HotSubstatus, TestLeadConditions};

/// Reason label for the temperature filter.
pub const LABEL_TEMPERATURE: &str = "Temperatura";
/// Reason label for the substatus filter.
pub const LABEL_SUBSTATUS: &str = "Substatus";
/// Reason label for the timer filter.
pub const LABEL_TIMER: &str = "Tempo sem interação";

/// Rendered value for a lead without a substatus.
const NO_SUBSTATUS: &str = "nenhum";
/// Rendered value for a lead without any recorded interaction.
const NO_INTERACTION: &str = "sem interação registrada";

/// Outcome of a single filter check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionReason {
    pub condition: String,
    pub passed: bool,
    pub actual: String,
    pub expected: String,
}

/// Outcome of testing one rule against one lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTestResult {
    pub matches: bool,
    pub reasons: Vec<ConditionReason>,
    /// The action the rule would perform, present only when `matches`.
    pub action: Option<TransitionAction>,
}

impl RuleTestResult {
    pub fn failed_reasons(&self) -> impl Iterator<Item = &ConditionReason> {
        self.reasons.iter().filter(|r| !r.passed)
    }
}

/// Test `rule` against `lead`.
///
/// Every applicable filter is evaluated and recorded so callers can show all
/// reasons at once. Wildcard filters pass vacuously and add no reason; the
/// timer threshold is inclusive.
pub fn test_rule(rule: &TemperatureTransitionRule, lead: &TestLeadConditions) -> RuleTestResult {
    let mut reasons = Vec::with_capacity(3);

    if let Some(expected) = rule.from_temperature {
        reasons.push(ConditionReason {
            condition: LABEL_TEMPERATURE.to_string(),
            passed: lead.temperature == expected,
            actual: lead.temperature.to_string(),
            expected: expected.to_string(),
        });
    }

    if let Some(expected) = rule.from_substatus {
        reasons.push(ConditionReason {
            condition: LABEL_SUBSTATUS.to_string(),
            passed: lead.substatus == Some(expected),
            actual: render_substatus(lead.substatus),
            expected: expected.to_string(),
        });
    }

    reasons.push(ConditionReason {
        condition: LABEL_TIMER.to_string(),
        passed: lead.minutes_since_interaction >= i64::from(rule.timer_minutes),
        actual: render_minutes(lead.minutes_since_interaction),
        expected: format!(">= {} min", rule.timer_minutes),
    });

    let matches = reasons.iter().all(|r| r.passed);

    RuleTestResult {
        matches,
        reasons,
        action: matches.then_some(rule.action),
    }
}

fn render_substatus(substatus: Option<HotSubstatus>) -> String {
    substatus
        .map(|s| s.to_string())
        .unwrap_or_else(|| NO_SUBSTATUS.to_string())
}

fn render_minutes(minutes: i64) -> String {
    if minutes == i64::MAX {
        NO_INTERACTION.to_string()
    } else {
        format!("{minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::Temperature;
    use crate::transition::rule::TriggerEvent;
    use assert_matches::assert_matches;

    fn make_rule(
        from_temperature: Option<Temperature>,
        from_substatus: Option<HotSubstatus>,
        timer_minutes: i32,
    ) -> TemperatureTransitionRule {
        TemperatureTransitionRule {
            id: 1,
            name: "Esfriar".into(),
            active: true,
            priority: 0,
            trigger_event: TriggerEvent::InactivityTimer,
            from_temperature,
            from_substatus,
            timer_minutes,
            action: TransitionAction {
                set_temperature: Some(Temperature::Frio),
                clear_substatus: true,
                set_substatus: None,
            },
        }
    }

    fn lead(
        temperature: Temperature,
        substatus: Option<HotSubstatus>,
        minutes: i64,
    ) -> TestLeadConditions {
        TestLeadConditions {
            temperature,
            substatus,
            minutes_since_interaction: minutes,
        }
    }

    #[test]
    fn wildcard_rule_matches_any_lead() {
        let rule = make_rule(None, None, 60);
        let result = test_rule(&rule, &lead(Temperature::Frio, None, 60));

        assert!(result.matches);
        assert_eq!(result.reasons.len(), 1);
        assert_eq!(result.reasons[0].condition, LABEL_TIMER);
        assert_matches!(result.action, Some(a) if a.set_temperature == Some(Temperature::Frio));
    }

    #[test]
    fn timer_threshold_is_inclusive() {
        let rule = make_rule(None, None, 60);

        let below = test_rule(&rule, &lead(Temperature::Novo, None, 59));
        assert!(!below.matches);
        assert!(!below.reasons[0].passed);
        assert_eq!(below.reasons[0].actual, "59 min");
        assert_eq!(below.reasons[0].expected, ">= 60 min");
        assert!(below.action.is_none());

        let at = test_rule(&rule, &lead(Temperature::Novo, None, 60));
        assert!(at.matches);
        assert!(at.reasons[0].passed);
    }

    #[test]
    fn temperature_mismatch_fails_even_when_timer_passes() {
        let rule = make_rule(Some(Temperature::Novo), None, 1440);
        let result = test_rule(&rule, &lead(Temperature::Quente, None, 2000));

        assert!(!result.matches);
        assert!(result.action.is_none());
        assert_eq!(result.reasons.len(), 2);

        let temp = &result.reasons[0];
        assert_eq!(temp.condition, LABEL_TEMPERATURE);
        assert!(!temp.passed);
        assert_eq!(temp.actual, "quente");
        assert_eq!(temp.expected, "novo");

        let timer = &result.reasons[1];
        assert!(timer.passed);
        assert_eq!(timer.actual, "2000 min");

        assert_eq!(result.failed_reasons().count(), 1);
    }

    #[test]
    fn substatus_filter() {
        let rule = make_rule(
            Some(Temperature::Quente),
            Some(HotSubstatus::AguardandoResposta),
            30,
        );

        let waiting = lead(
            Temperature::Quente,
            Some(HotSubstatus::AguardandoResposta),
            45,
        );
        assert!(test_rule(&rule, &waiting).matches);

        let talking = lead(Temperature::Quente, Some(HotSubstatus::EmConversa), 45);
        let result = test_rule(&rule, &talking);
        assert!(!result.matches);
        assert_eq!(result.reasons[1].actual, "em_conversa");

        let none = lead(Temperature::Quente, None, 45);
        let result = test_rule(&rule, &none);
        assert!(!result.matches);
        assert_eq!(result.reasons[1].actual, "nenhum");
        assert_eq!(result.reasons[1].expected, "aguardando_resposta");
    }

    #[test]
    fn all_conditions_are_recorded_when_several_fail() {
        let rule = make_rule(Some(Temperature::Novo), Some(HotSubstatus::EmConversa), 60);
        let result = test_rule(&rule, &lead(Temperature::Frio, None, 10));

        assert_eq!(result.reasons.len(), 3);
        assert_eq!(result.failed_reasons().count(), 3);
    }

    #[test]
    fn never_interacted_renders_readably() {
        let rule = make_rule(None, None, 60);
        let result = test_rule(&rule, &lead(Temperature::Novo, None, i64::MAX));
        assert!(result.matches);
        assert_eq!(result.reasons[0].actual, "sem interação registrada");
    }
}
