//! Lead temperature, hot substatus and the snapshots rules are tested against.
//!
//! The temperature lifecycle (`novo -> quente -> frio -> perdido`) is driven
//! by rule data, not by code. This module only describes the states and
//! computes what a rule action would turn a lead into.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::transition::rule::TransitionAction;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// Coarse engagement state of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Novo,
    Quente,
    Frio,
    Perdido,
}

impl Temperature {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novo => "novo",
            Self::Quente => "quente",
            Self::Frio => "frio",
            Self::Perdido => "perdido",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "novo" => Ok(Self::Novo),
            "quente" => Ok(Self::Quente),
            "frio" => Ok(Self::Frio),
            "perdido" => Ok(Self::Perdido),
            _ => Err(CoreError::Validation(format!(
                "Invalid temperature: '{s}'. Must be one of: novo, quente, frio, perdido"
            ))),
        }
    }

    /// Whether triggers and transition rules may filter on or assign this
    /// temperature. `perdido` is set by hand only.
    pub fn is_automatable(&self) -> bool {
        !matches!(self, Self::Perdido)
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HotSubstatus
// ---------------------------------------------------------------------------

/// Finer-grained state of a lead while it is `quente`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotSubstatus {
    EmConversa,
    AguardandoResposta,
}

impl HotSubstatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmConversa => "em_conversa",
            Self::AguardandoResposta => "aguardando_resposta",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "em_conversa" => Ok(Self::EmConversa),
            "aguardando_resposta" => Ok(Self::AguardandoResposta),
            _ => Err(CoreError::Validation(format!(
                "Invalid hot substatus: '{s}'. Must be one of: em_conversa, aguardando_resposta"
            ))),
        }
    }
}

impl std::fmt::Display for HotSubstatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an optional substatus column.
pub fn parse_optional_substatus(s: Option<&str>) -> Result<Option<HotSubstatus>, CoreError> {
    s.map(HotSubstatus::from_str).transpose()
}

/// Parse an optional temperature column.
pub fn parse_optional_temperature(s: Option<&str>) -> Result<Option<Temperature>, CoreError> {
    s.map(Temperature::from_str).transpose()
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The temperature/substatus pair a rule action reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadState {
    pub temperature: Temperature,
    pub substatus: Option<HotSubstatus>,
}

/// Hypothetical lead fed to the rule tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestLeadConditions {
    pub temperature: Temperature,
    #[serde(default)]
    pub substatus: Option<HotSubstatus>,
    pub minutes_since_interaction: i64,
}

impl TestLeadConditions {
    /// Build tester input from a stored lead at instant `now`.
    pub fn from_snapshot(
        state: LeadState,
        last_interaction_at: Option<Timestamp>,
        now: Timestamp,
    ) -> Self {
        Self {
            temperature: state.temperature,
            substatus: state.substatus,
            minutes_since_interaction: minutes_since(last_interaction_at, now),
        }
    }
}

/// Whole minutes elapsed between the last interaction and `now`.
///
/// Future timestamps clamp to 0. A lead that never interacted counts as
/// infinitely idle, so every timer threshold passes.
pub fn minutes_since(last_interaction_at: Option<Timestamp>, now: Timestamp) -> i64 {
    match last_interaction_at {
        Some(at) => (now - at).num_minutes().max(0),
        None => i64::MAX,
    }
}

/// Compute the state a lead would be in after `action` runs.
///
/// Steps run in order: set temperature, clear substatus, set substatus.
/// A substatus only exists under `quente`, so any result with another
/// temperature has it dropped.
pub fn apply_transition(state: &LeadState, action: &TransitionAction) -> LeadState {
    let temperature = action.set_temperature.unwrap_or(state.temperature);

    let mut substatus = state.substatus;
    if action.clear_substatus {
        substatus = None;
    }
    if let Some(next) = action.set_substatus {
        substatus = Some(next);
    }
    if temperature != Temperature::Quente {
        substatus = None;
    }

    LeadState {
        temperature,
        substatus,
    }
}
