//! Repository for the `interest_triggers` table.

use odonto_core::interest::trigger::InterestTrigger;
use odonto_core::types::DbId;
use sqlx::PgPool;

use crate::models::interest_trigger::InterestTriggerRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, name, priority, is_active, condition_field, \
    condition_operator, condition_value, case_sensitive, action_set_interest_id, \
    action_set_source_id, action_set_temperature, action_set_status, created_at, updated_at";

/// Provides CRUD and reordering for interest triggers.
pub struct InterestTriggerRepo;

impl InterestTriggerRepo {
    /// Insert a new trigger. A missing priority appends it after the last one.
    ///
    /// The `id` and `priority` fields of `trigger` are ignored.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        trigger: &InterestTrigger,
        priority: Option<i32>,
    ) -> Result<InterestTriggerRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO interest_triggers (organization_id, name, priority, is_active,
                condition_field, condition_operator, condition_value, case_sensitive,
                action_set_interest_id, action_set_source_id, action_set_temperature,
                action_set_status)
             VALUES ($1, $2,
                COALESCE($3, (SELECT COALESCE(MAX(priority) + 1, 0)
                              FROM interest_triggers WHERE organization_id = $1)),
                $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterestTriggerRow>(&query)
            .bind(organization_id)
            .bind(&trigger.name)
            .bind(priority)
            .bind(trigger.active)
            .bind(trigger.condition_field.as_str())
            .bind(trigger.condition_operator.as_str())
            .bind(&trigger.condition_value)
            .bind(trigger.case_sensitive)
            .bind(trigger.actions.set_interest_id)
            .bind(trigger.actions.set_source_id)
            .bind(trigger.actions.set_temperature.map(|t| t.as_str()))
            .bind(&trigger.actions.set_status)
            .fetch_one(pool)
            .await
    }

    /// Find a trigger by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<InterestTriggerRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interest_triggers WHERE id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, InterestTriggerRow>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List triggers in evaluation order, optionally including inactive ones.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<InterestTriggerRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interest_triggers
             WHERE organization_id = $1 AND ($2 OR is_active = true)
             ORDER BY priority ASC, id ASC"
        );
        sqlx::query_as::<_, InterestTriggerRow>(&query)
            .bind(organization_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// List only active triggers in evaluation order.
    pub async fn list_active(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<InterestTriggerRow>, sqlx::Error> {
        Self::list(pool, organization_id, false).await
    }

    /// Overwrite every editable column from an already-merged trigger.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        trigger: &InterestTrigger,
    ) -> Result<Option<InterestTriggerRow>, sqlx::Error> {
        let query = format!(
            "UPDATE interest_triggers SET
                name = $3,
                priority = $4,
                is_active = $5,
                condition_field = $6,
                condition_operator = $7,
                condition_value = $8,
                case_sensitive = $9,
                action_set_interest_id = $10,
                action_set_source_id = $11,
                action_set_temperature = $12,
                action_set_status = $13
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterestTriggerRow>(&query)
            .bind(trigger.id)
            .bind(organization_id)
            .bind(&trigger.name)
            .bind(trigger.priority)
            .bind(trigger.active)
            .bind(trigger.condition_field.as_str())
            .bind(trigger.condition_operator.as_str())
            .bind(&trigger.condition_value)
            .bind(trigger.case_sensitive)
            .bind(trigger.actions.set_interest_id)
            .bind(trigger.actions.set_source_id)
            .bind(trigger.actions.set_temperature.map(|t| t.as_str()))
            .bind(&trigger.actions.set_status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a trigger. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM interest_triggers WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(organization_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite priorities for a set of triggers in one transaction.
    pub async fn reorder(
        pool: &PgPool,
        organization_id: DbId,
        priorities: &[(DbId, i32)],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (id, priority) in priorities {
            sqlx::query(
                "UPDATE interest_triggers SET priority = $3 \
                 WHERE id = $1 AND organization_id = $2",
            )
            .bind(id)
            .bind(organization_id)
            .bind(priority)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(
            organization_id,
            count = priorities.len(),
            "Rewrote interest trigger priorities"
        );
        Ok(())
    }
}
