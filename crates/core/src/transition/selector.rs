//! First-match selection over a rule set.

use super::rule::TemperatureTransitionRule;
use super::tester::{test_rule, RuleTestResult};
use crate::lead::TestLeadConditions;

/// Return the first active rule, in ascending `priority`, that matches `lead`,
/// together with its test result.
pub fn first_matching_rule<'a>(
    rules: &'a [TemperatureTransitionRule],
    lead: &TestLeadConditions,
) -> Option<(&'a TemperatureTransitionRule, RuleTestResult)> {
    let mut ordered: Vec<&TemperatureTransitionRule> = rules.iter().filter(|r| r.active).collect();
    ordered.sort_by_key(|r| r.priority);

    ordered.into_iter().find_map(|rule| {
        let result = test_rule(rule, lead);
        result.matches.then_some((rule, result))
    })
}
