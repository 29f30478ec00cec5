//! Priority-ordered trigger matching.

use super::condition::evaluate_condition;
use super::trigger::{InterestTrigger, MessageContext};

/// Return the first active trigger, in ascending `priority`, whose condition
/// holds for `ctx`.
///
/// Evaluation stops at the first match, so only that trigger's action bundle
/// applies. Triggers sharing a priority keep their input order.
pub fn match_trigger<'a>(
    triggers: &'a [InterestTrigger],
    ctx: &MessageContext,
) -> Option<&'a InterestTrigger> {
    let mut ordered: Vec<&InterestTrigger> = triggers.iter().filter(|t| t.active).collect();
    ordered.sort_by_key(|t| t.priority);

    ordered
        .into_iter()
        .find(|t| test_trigger(t, ctx.field(t.condition_field)))
}

/// Evaluate a single trigger against one candidate string.
///
/// Backs the interactive "try a message" check, so `active` is not consulted.
pub fn test_trigger(trigger: &InterestTrigger, candidate: Option<&str>) -> bool {
    evaluate_condition(
        candidate,
        trigger.condition_operator,
        &trigger.condition_value,
        trigger.case_sensitive,
    )
}
