//! Handlers that run the automation against a stored lead.
//!
//! `classify` applies the winning interest trigger for an inbound message;
//! `evaluate` reports (and optionally applies) the first transition rule the
//! lead currently satisfies.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use odonto_core::error::CoreError;
use odonto_core::interest::matcher::match_trigger;
use odonto_core::interest::trigger::MessageContext;
use odonto_core::lead::{apply_transition, TestLeadConditions};
use odonto_core::transition::selector::first_matching_rule;
use odonto_core::transition::tester::RuleTestResult;
use odonto_core::transition::trace::format_reasons;
use odonto_core::types::{DbId, Timestamp};
use odonto_db::models::lead::Lead;
use odonto_db::repositories::LeadRepo;

use super::interest_triggers::load_active_triggers;
use super::transition_rules::load_active_rules;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lead_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Lead", id })
}

async fn ensure_lead_exists(pool: &sqlx::PgPool, org_id: DbId, id: DbId) -> AppResult<Lead> {
    LeadRepo::find_by_id(pool, org_id, id)
        .await?
        .ok_or_else(|| lead_not_found(id))
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /{id}/classify`.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(flatten)]
    pub context: MessageContext,
    /// When the message arrived; defaults to now.
    #[serde(default)]
    pub received_at: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub trigger_id: Option<DbId>,
    pub trigger_name: Option<String>,
    pub lead: Lead,
}

/// Query parameters for `POST /{id}/evaluate`.
#[derive(Debug, Deserialize)]
pub struct EvaluateParams {
    /// Persist the matched action instead of only reporting it.
    #[serde(default)]
    pub apply: bool,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    /// The snapshot the rules were tested against.
    pub conditions: Option<TestLeadConditions>,
    pub rule_id: Option<DbId>,
    pub rule_name: Option<String>,
    pub result: Option<RuleTestResult>,
    pub trace: Vec<String>,
    pub applied: bool,
    pub lead: Lead,
}

// ---------------------------------------------------------------------------
// GET /{id}
// ---------------------------------------------------------------------------

pub async fn get_lead(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let lead = ensure_lead_exists(&state.pool, org_id, id).await?;
    Ok(Json(DataResponse { data: lead }))
}

// ---------------------------------------------------------------------------
// POST /{id}/classify
// ---------------------------------------------------------------------------

/// Record an inbound message on the lead and apply the first matching
/// trigger's actions. At most one trigger fires per message.
///
/// Lost leads (`perdido`) only get the interaction recorded. The lead row is
/// locked for the whole read-modify-write and both writes commit together.
pub async fn classify_lead(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<ClassifyRequest>,
) -> AppResult<impl IntoResponse> {
    let received_at = input.received_at.unwrap_or_else(Utc::now);
    let triggers = load_active_triggers(&state.pool, org_id).await?;

    let mut tx = state.pool.begin().await?;

    let current = LeadRepo::find_by_id_for_update(&mut *tx, org_id, id)
        .await?
        .ok_or_else(|| lead_not_found(id))?;
    let automatable = current.state()?.temperature.is_automatable();

    let mut lead = LeadRepo::touch_interaction(&mut *tx, org_id, id, received_at)
        .await?
        .ok_or_else(|| lead_not_found(id))?;

    let winner = if automatable {
        match_trigger(&triggers, &input.context)
    } else {
        None
    };

    if let Some(trigger) = winner {
        lead = LeadRepo::apply_trigger_actions(&mut *tx, org_id, id, &trigger.actions)
            .await?
            .ok_or_else(|| lead_not_found(id))?;
    }

    tx.commit().await?;

    match winner {
        Some(trigger) => tracing::info!(
            organization_id = org_id,
            lead_id = id,
            trigger_id = trigger.id,
            trigger_name = %trigger.name,
            temperature = %lead.temperature,
            "Interest trigger applied to lead",
        ),
        None if !automatable => tracing::debug!(
            organization_id = org_id,
            lead_id = id,
            temperature = %lead.temperature,
            "Lead is not automatable, interaction recorded only",
        ),
        None => {
            tracing::debug!(organization_id = org_id, lead_id = id, "No interest trigger matched")
        }
    }

    Ok(Json(DataResponse {
        data: ClassifyResponse {
            trigger_id: winner.map(|t| t.id),
            trigger_name: winner.map(|t| t.name.clone()),
            lead,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /{id}/evaluate
// ---------------------------------------------------------------------------

/// Find the first active rule the lead satisfies right now.
///
/// Leads whose temperature is not automatable (`perdido`) are never matched.
/// With `?apply=true` the matched action is written to the lead; the row is
/// locked between reading its state and writing the new one.
pub async fn evaluate_lead(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Query(params): Query<EvaluateParams>,
) -> AppResult<impl IntoResponse> {
    let rules = load_active_rules(&state.pool, org_id).await?;

    let mut tx = state.pool.begin().await?;

    let lead = LeadRepo::find_by_id_for_update(&mut *tx, org_id, id)
        .await?
        .ok_or_else(|| lead_not_found(id))?;
    let current = lead.state()?;

    if !current.temperature.is_automatable() {
        return Ok(Json(DataResponse {
            data: EvaluateResponse {
                conditions: None,
                rule_id: None,
                rule_name: None,
                result: None,
                trace: Vec::new(),
                applied: false,
                lead,
            },
        }));
    }

    let conditions =
        TestLeadConditions::from_snapshot(current, lead.last_interaction_at, Utc::now());

    let Some((rule, result)) = first_matching_rule(&rules, &conditions) else {
        return Ok(Json(DataResponse {
            data: EvaluateResponse {
                conditions: Some(conditions),
                rule_id: None,
                rule_name: None,
                result: None,
                trace: Vec::new(),
                applied: false,
                lead,
            },
        }));
    };

    let trace = format_reasons(&result.reasons);
    let mut lead = lead;
    let mut applied = false;

    if params.apply {
        let next = apply_transition(&current, &rule.action);
        lead = LeadRepo::apply_state(&mut *tx, org_id, id, &next)
            .await?
            .ok_or_else(|| lead_not_found(id))?;
        tx.commit().await?;
        applied = true;

        tracing::info!(
            organization_id = org_id,
            lead_id = id,
            rule_id = rule.id,
            from = %current.temperature,
            to = %next.temperature,
            "Temperature rule applied to lead",
        );
    }

    Ok(Json(DataResponse {
        data: EvaluateResponse {
            conditions: Some(conditions),
            rule_id: Some(rule.id),
            rule_name: Some(rule.name.clone()),
            result: Some(result),
            trace,
            applied,
            lead,
        },
    }))
}
