//! Handlers for interest triggers: CRUD, reorder, and the dry-run test and
//! match endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use odonto_core::error::CoreError;
use odonto_core::interest::matcher::{match_trigger, test_trigger};
use odonto_core::interest::trigger::{InterestTrigger, MessageContext};
use odonto_core::interest::validation::validate_trigger;
use odonto_core::ordering::{priorities_for, validate_reorder};
use odonto_core::types::DbId;
use odonto_db::models::interest_trigger::{
    CreateInterestTrigger, InterestTriggerRow, ReorderRequest, UpdateInterestTrigger,
};
use odonto_db::repositories::InterestTriggerRepo;

use super::ensure_organization_exists;
use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a trigger exists in the organization, returning the full row.
async fn ensure_trigger_exists(
    pool: &sqlx::PgPool,
    org_id: DbId,
    id: DbId,
) -> AppResult<InterestTriggerRow> {
    InterestTriggerRepo::find_by_id(pool, org_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InterestTrigger",
            id,
        }))
}

/// Load the organization's active triggers as typed values.
pub(crate) async fn load_active_triggers(
    pool: &sqlx::PgPool,
    org_id: DbId,
) -> AppResult<Vec<InterestTrigger>> {
    let rows = InterestTriggerRepo::list_active(pool, org_id).await?;
    let triggers = rows
        .into_iter()
        .map(InterestTriggerRow::into_core)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(triggers)
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /{id}/test`.
#[derive(Debug, Deserialize)]
pub struct TestTriggerRequest {
    /// The string to test; `null` or absent means the field is missing.
    #[serde(default)]
    pub candidate: Option<String>,
}

/// Body for `POST /test`: an unsaved trigger definition plus the candidate.
#[derive(Debug, Deserialize)]
pub struct TestTriggerDefinitionRequest {
    pub trigger: CreateInterestTrigger,
    #[serde(default)]
    pub candidate: Option<String>,
}

/// Result of testing a single trigger.
#[derive(Debug, Serialize)]
pub struct TriggerTestResponse {
    pub matches: bool,
}

/// Result of running the matcher over the active trigger set.
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    /// The winning trigger, if any.
    pub trigger: Option<InterestTrigger>,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// List triggers in priority order. Inactive triggers only on request.
pub async fn list_triggers(
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let triggers =
        InterestTriggerRepo::list(&state.pool, org_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: triggers }))
}

// ---------------------------------------------------------------------------
// POST /
// ---------------------------------------------------------------------------

/// Create a trigger. Without an explicit priority it is appended last.
pub async fn create_trigger(
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreateInterestTrigger>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let trigger = input.to_core();
    validate_trigger(&trigger)?;

    ensure_organization_exists(&state.pool, org_id).await?;

    let row = InterestTriggerRepo::create(&state.pool, org_id, &trigger, input.priority).await?;

    tracing::info!(
        organization_id = org_id,
        trigger_id = row.id,
        name = %row.name,
        priority = row.priority,
        "Interest trigger created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

// ---------------------------------------------------------------------------
// GET /{id}
// ---------------------------------------------------------------------------

pub async fn get_trigger(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let row = ensure_trigger_exists(&state.pool, org_id, id).await?;
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// PUT /{id}
// ---------------------------------------------------------------------------

/// Update a trigger. The merged result is validated as a whole.
pub async fn update_trigger(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateInterestTrigger>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let mut trigger = ensure_trigger_exists(&state.pool, org_id, id)
        .await?
        .into_core()?;
    input.apply_to(&mut trigger);
    validate_trigger(&trigger)?;

    let row = InterestTriggerRepo::update(&state.pool, org_id, &trigger)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InterestTrigger",
            id,
        }))?;

    tracing::info!(
        organization_id = org_id,
        trigger_id = id,
        active = row.is_active,
        "Interest trigger updated",
    );

    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// DELETE /{id}
// ---------------------------------------------------------------------------

pub async fn delete_trigger(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let deleted = InterestTriggerRepo::delete(&state.pool, org_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "InterestTrigger",
            id,
        }));
    }

    tracing::info!(organization_id = org_id, trigger_id = id, "Interest trigger deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /reorder
// ---------------------------------------------------------------------------

/// Rewrite priorities of the active triggers from the submitted order.
pub async fn reorder_triggers(
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    let existing: Vec<DbId> = InterestTriggerRepo::list_active(&state.pool, org_id)
        .await?
        .iter()
        .map(|row| row.id)
        .collect();
    validate_reorder(&existing, &input.ids)?;

    InterestTriggerRepo::reorder(&state.pool, org_id, &priorities_for(&input.ids)).await?;

    tracing::info!(
        organization_id = org_id,
        count = input.ids.len(),
        "Interest triggers reordered",
    );

    let triggers = InterestTriggerRepo::list_active(&state.pool, org_id).await?;
    Ok(Json(DataResponse { data: triggers }))
}

// ---------------------------------------------------------------------------
// POST /{id}/test
// ---------------------------------------------------------------------------

/// Test a stored trigger against a candidate string, active or not.
pub async fn test_stored_trigger(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<TestTriggerRequest>,
) -> AppResult<impl IntoResponse> {
    let trigger = ensure_trigger_exists(&state.pool, org_id, id)
        .await?
        .into_core()?;

    let matches = test_trigger(&trigger, input.candidate.as_deref());
    Ok(Json(DataResponse {
        data: TriggerTestResponse { matches },
    }))
}

// ---------------------------------------------------------------------------
// POST /test
// ---------------------------------------------------------------------------

/// Test a trigger definition that has not been saved yet.
///
/// Only field-level checks run: an invalid regex simply does not match.
pub async fn test_trigger_definition(
    Json(input): Json<TestTriggerDefinitionRequest>,
) -> AppResult<impl IntoResponse> {
    input.trigger.validate()?;
    let trigger = input.trigger.to_core();
    let matches = test_trigger(&trigger, input.candidate.as_deref());
    Ok(Json(DataResponse {
        data: TriggerTestResponse { matches },
    }))
}

// ---------------------------------------------------------------------------
// POST /match
// ---------------------------------------------------------------------------

/// Run the matcher over the active triggers without touching any lead.
pub async fn match_triggers(
    State(state): State<AppState>,
    Path(org_id): Path<DbId>,
    Json(context): Json<MessageContext>,
) -> AppResult<impl IntoResponse> {
    let triggers = load_active_triggers(&state.pool, org_id).await?;
    let winner = match_trigger(&triggers, &context).cloned();
    Ok(Json(DataResponse {
        data: MatchResponse { trigger: winner },
    }))
}
