//! Condition evaluator: pure string matching over one field value.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// ConditionField
// ---------------------------------------------------------------------------

/// Which piece of the inbound conversation a trigger inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    FirstMessage,
    AnyMessage,
    PushName,
    SourceName,
}

impl ConditionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstMessage => "first_message",
            Self::AnyMessage => "any_message",
            Self::PushName => "push_name",
            Self::SourceName => "source_name",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "first_message" => Ok(Self::FirstMessage),
            "any_message" => Ok(Self::AnyMessage),
            "push_name" => Ok(Self::PushName),
            "source_name" => Ok(Self::SourceName),
            _ => Err(CoreError::Validation(format!(
                "Invalid condition_field: '{s}'. Must be one of: first_message, any_message, \
                 push_name, source_name"
            ))),
        }
    }
}

impl std::fmt::Display for ConditionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConditionOperator
// ---------------------------------------------------------------------------

/// Comparison applied between the selected field and the trigger's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Contains,
    NotContains,
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
    Regex,
    IsEmpty,
    IsNotEmpty,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Regex => "regex",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            "equals" => Ok(Self::Equals),
            "not_equals" => Ok(Self::NotEquals),
            "starts_with" => Ok(Self::StartsWith),
            "ends_with" => Ok(Self::EndsWith),
            "regex" => Ok(Self::Regex),
            "is_empty" => Ok(Self::IsEmpty),
            "is_not_empty" => Ok(Self::IsNotEmpty),
            _ => Err(CoreError::Validation(format!(
                "Invalid condition_operator: '{s}'. Must be one of: contains, not_contains, \
                 equals, not_equals, starts_with, ends_with, regex, is_empty, is_not_empty"
            ))),
        }
    }

    /// Whether the operator reads `condition_value` at all.
    pub fn uses_value(&self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

impl std::fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate one condition against a field value.
///
/// A missing value behaves like the empty string. Without `case_sensitive`
/// both sides are lower-cased before comparing; `regex` instead compiles the
/// pattern case-insensitively. An invalid pattern is a non-match.
pub fn evaluate_condition(
    value: Option<&str>,
    operator: ConditionOperator,
    compare_value: &str,
    case_sensitive: bool,
) -> bool {
    let raw = value.unwrap_or("");
    let fold = |s: &str| {
        if case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };

    match operator {
        // Length-only checks: compare_value and case_sensitive are ignored.
        ConditionOperator::IsEmpty => raw.trim().is_empty(),
        ConditionOperator::IsNotEmpty => !raw.trim().is_empty(),
        ConditionOperator::Regex => evaluate_regex(raw, compare_value, case_sensitive),
        ConditionOperator::Contains => fold(raw).contains(&fold(compare_value)),
        ConditionOperator::NotContains => !fold(raw).contains(&fold(compare_value)),
        ConditionOperator::Equals => fold(raw) == fold(compare_value),
        ConditionOperator::NotEquals => fold(raw) != fold(compare_value),
        ConditionOperator::StartsWith => fold(raw).starts_with(&fold(compare_value)),
        ConditionOperator::EndsWith => fold(raw).ends_with(&fold(compare_value)),
    }
}

fn evaluate_regex(value: &str, pattern: &str, case_sensitive: bool) -> bool {
    match RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => re.is_match(value),
        Err(err) => {
            tracing::debug!(pattern, error = %err, "Invalid trigger regex treated as non-match");
            false
        }
    }
}
