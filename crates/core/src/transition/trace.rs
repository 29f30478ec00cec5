//! Human-readable reason lines for the rule tester.

use super::tester::ConditionReason;

/// Render one line per reason: `"{label}: {actual} (esperado: {expected})"`.
pub fn format_reasons(reasons: &[ConditionReason]) -> Vec<String> {
    reasons.iter().map(format_reason).collect()
}

pub fn format_reason(reason: &ConditionReason) -> String {
    format!(
        "{}: {} (esperado: {})",
        reason.condition, reason.actual, reason.expected
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(condition: &str, passed: bool, actual: &str, expected: &str) -> ConditionReason {
        ConditionReason {
            condition: condition.into(),
            passed,
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    #[test]
    fn one_line_per_reason() {
        let lines = format_reasons(&[
            reason("Temperatura", false, "quente", "novo"),
            reason("Tempo sem interação", true, "45 min", ">= 60 min"),
        ]);
        assert_eq!(
            lines,
            vec![
                "Temperatura: quente (esperado: novo)",
                "Tempo sem interação: 45 min (esperado: >= 60 min)",
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(format_reasons(&[]).is_empty());
    }
}
