//! Handlers for temperature transition rules: CRUD, reorder, and the rule
//! tester endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use odonto_core::error::CoreError;
use odonto_core::lead::TestLeadConditions;
use odonto_core::ordering::{priorities_for, validate_reorder};
use odonto_core::transition::rule::TemperatureTransitionRule;
use odonto_core::transition::tester::{test_rule, RuleTestResult};
use odonto_core::transition::trace::format_reasons;
use odonto_core::transition::validation::validate_rule;
use odonto_core::types::DbId;
use odonto_db::models::interest_trigger::ReorderRequest;
use odonto_db::models::transition_rule::{
    CreateTransitionRule, TransitionRuleRow, UpdateTransitionRule,
};
use odonto_db::repositories::TransitionRuleRepo;

use super::ensure_organization_exists;
use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_rule_exists(
    pool: &sqlx::PgPool,
    org_id: DbId,
    id: DbId,
) -> AppResult<TransitionRuleRow> {
    TransitionRuleRepo::find_by_id(pool, org_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TemperatureTransitionRule",
            id,
        }))
}

fn ensure_valid_lead(lead: &TestLeadConditions) -> AppResult<()> {
    if lead.minutes_since_interaction < 0 {
        return Err(AppError::BadRequest(
            "minutes_since_interaction must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Load the organization's active rules as typed values.
pub(crate) async fn load_active_rules(
    pool: &sqlx::PgPool,
    org_id: DbId,
) -> AppResult<Vec<TemperatureTransitionRule>> {
    let rows = TransitionRuleRepo::list_active(pool, org_id).await?;
    let rules = rows
        .into_iter()
        .map(TransitionRuleRow::into_core)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rules)
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /test`: an unsaved rule definition plus the hypothetical lead.
#[derive(Debug, Deserialize)]
pub struct TestRuleDefinitionRequest {
    pub rule: CreateTransitionRule,
    pub lead: TestLeadConditions,
}

/// Tester output plus the human-readable trace of its reasons.
#[derive(Debug, Serialize)]
pub struct RuleTestResponse {
    #[serde(flatten)]
    pub result: RuleTestResult,
    pub trace: Vec<String>,
}

impl From<RuleTestResult> for RuleTestResponse {
    fn from(result: RuleTestResult) -> Self {
        let trace = format_reasons(&result.reasons);
        Self { result, trace }
    }
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub async fn list_rules(
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let rules = TransitionRuleRepo::list(&state.pool, org_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: rules }))
}

// ---------------------------------------------------------------------------
// POST /
// ---------------------------------------------------------------------------

/// Create a rule. A missing timer takes the default for its trigger event.
pub async fn create_rule(
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreateTransitionRule>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let rule = input.to_core(&state.config.automation);
    validate_rule(&rule)?;

    ensure_organization_exists(&state.pool, org_id).await?;

    let row = TransitionRuleRepo::create(&state.pool, org_id, &rule, input.priority).await?;

    tracing::info!(
        organization_id = org_id,
        rule_id = row.id,
        trigger_event = %row.trigger_event,
        timer_minutes = row.timer_minutes,
        "Temperature rule created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

// ---------------------------------------------------------------------------
// GET /{id}
// ---------------------------------------------------------------------------

pub async fn get_rule(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let row = ensure_rule_exists(&state.pool, org_id, id).await?;
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// PUT /{id}
// ---------------------------------------------------------------------------

pub async fn update_rule(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTransitionRule>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let mut rule = ensure_rule_exists(&state.pool, org_id, id)
        .await?
        .into_core()?;
    input.apply_to(&mut rule);
    validate_rule(&rule)?;

    let row = TransitionRuleRepo::update(&state.pool, org_id, &rule)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TemperatureTransitionRule",
            id,
        }))?;

    tracing::info!(
        organization_id = org_id,
        rule_id = id,
        active = row.is_active,
        "Temperature rule updated",
    );

    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// DELETE /{id}
// ---------------------------------------------------------------------------

pub async fn delete_rule(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let deleted = TransitionRuleRepo::delete(&state.pool, org_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TemperatureTransitionRule",
            id,
        }));
    }

    tracing::info!(organization_id = org_id, rule_id = id, "Temperature rule deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /reorder
// ---------------------------------------------------------------------------

pub async fn reorder_rules(
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    let existing: Vec<DbId> = TransitionRuleRepo::list_active(&state.pool, org_id)
        .await?
        .iter()
        .map(|row| row.id)
        .collect();
    validate_reorder(&existing, &input.ids)?;

    TransitionRuleRepo::reorder(&state.pool, org_id, &priorities_for(&input.ids)).await?;

    tracing::info!(
        organization_id = org_id,
        count = input.ids.len(),
        "Temperature rules reordered",
    );

    let rules = TransitionRuleRepo::list_active(&state.pool, org_id).await?;
    Ok(Json(DataResponse { data: rules }))
}

// ---------------------------------------------------------------------------
// POST /{id}/test
// ---------------------------------------------------------------------------

/// Test a stored rule against a hypothetical lead. Nothing is persisted.
pub async fn test_stored_rule(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(lead): Json<TestLeadConditions>,
) -> AppResult<impl IntoResponse> {
    ensure_valid_lead(&lead)?;
    let rule = ensure_rule_exists(&state.pool, org_id, id)
        .await?
        .into_core()?;

    let response = RuleTestResponse::from(test_rule(&rule, &lead));
    Ok(Json(DataResponse { data: response }))
}

// ---------------------------------------------------------------------------
// POST /test
// ---------------------------------------------------------------------------

/// Test a rule definition from the editor before it is saved.
///
/// Field-level checks (name, `timer_minutes >= 1`) apply; the cross-field
/// save-time checks do not, so incomplete drafts can still be tried out.
pub async fn test_rule_definition(
    State(state): State<AppState>,
    Json(input): Json<TestRuleDefinitionRequest>,
) -> AppResult<impl IntoResponse> {
    input.rule.validate()?;
    ensure_valid_lead(&input.lead)?;

    let rule = input.rule.to_core(&state.config.automation);
    let response = RuleTestResponse::from(test_rule(&rule, &input.lead));
    Ok(Json(DataResponse { data: response }))
}
