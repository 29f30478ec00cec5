//! Repository for the `leads` table (automation columns only).

use odonto_core::interest::trigger::TriggerActions;
use odonto_core::lead::LeadState;
use odonto_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::lead::{CreateLead, Lead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, name, phone, temperature, hot_substatus, status, \
    interest_id, source_id, last_interaction_at, created_at, updated_at";

/// Reads and automation-driven writes for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateLead,
    ) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (organization_id, name, phone, temperature, status,
                last_interaction_at)
             VALUES ($1, $2, $3, COALESCE($4, 'novo'), COALESCE($5, 'novo'), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.temperature.map(|t| t.as_str()))
            .bind(&input.status)
            .bind(input.last_interaction_at)
            .fetch_one(pool)
            .await
    }

    /// Find a lead by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a lead and lock its row until the surrounding transaction ends.
    ///
    /// Read-then-write automation paths go through this so a concurrent
    /// classify or evaluate cannot overwrite their result.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads WHERE id = $1 AND organization_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(conn)
            .await
    }

    /// Write a new temperature/substatus pair.
    pub async fn apply_state<'e, E: PgExecutor<'e>>(
        executor: E,
        organization_id: DbId,
        id: DbId,
        state: &LeadState,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET temperature = $3, hot_substatus = $4
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(state.temperature.as_str())
            .bind(state.substatus.map(|s| s.as_str()))
            .fetch_optional(executor)
            .await
    }

    /// Write the action bundle of a matched interest trigger.
    ///
    /// Unset actions leave their column untouched. Moving the lead out of
    /// `quente` drops its substatus.
    pub async fn apply_trigger_actions<'e, E: PgExecutor<'e>>(
        executor: E,
        organization_id: DbId,
        id: DbId,
        actions: &TriggerActions,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET
                interest_id = COALESCE($3, interest_id),
                source_id = COALESCE($4, source_id),
                temperature = COALESCE($5, temperature),
                hot_substatus = CASE
                    WHEN COALESCE($5, temperature) = 'quente' THEN hot_substatus
                    ELSE NULL
                END,
                status = COALESCE($6, status)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(actions.set_interest_id)
            .bind(actions.set_source_id)
            .bind(actions.set_temperature.map(|t| t.as_str()))
            .bind(&actions.set_status)
            .fetch_optional(executor)
            .await
    }

    /// Record an interaction at `at`, restarting every inactivity timer.
    pub async fn touch_interaction<'e, E: PgExecutor<'e>>(
        executor: E,
        organization_id: DbId,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET last_interaction_at = $3
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(at)
            .fetch_optional(executor)
            .await
    }
}
