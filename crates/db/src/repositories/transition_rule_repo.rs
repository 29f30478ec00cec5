//! Repository for the `temperature_transition_rules` table.

use odonto_core::transition::rule::TemperatureTransitionRule;
use odonto_core::types::DbId;
use sqlx::PgPool;

use crate::models::transition_rule::TransitionRuleRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, name, priority, is_active, trigger_event, \
    from_temperature, from_substatus, timer_minutes, action_set_temperature, \
    action_clear_substatus, action_set_substatus, created_at, updated_at";

/// Provides CRUD and reordering for temperature transition rules.
pub struct TransitionRuleRepo;

impl TransitionRuleRepo {
    /// Insert a new rule. A missing priority appends it after the last one.
    ///
    /// `rule` carries resolved defaults; its `id` and `priority` fields are
    /// ignored.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        rule: &TemperatureTransitionRule,
        priority: Option<i32>,
    ) -> Result<TransitionRuleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO temperature_transition_rules (organization_id, name, priority,
                is_active, trigger_event, from_temperature, from_substatus, timer_minutes,
                action_set_temperature, action_clear_substatus, action_set_substatus)
             VALUES ($1, $2,
                COALESCE($3, (SELECT COALESCE(MAX(priority) + 1, 0)
                              FROM temperature_transition_rules WHERE organization_id = $1)),
                $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TransitionRuleRow>(&query)
            .bind(organization_id)
            .bind(&rule.name)
            .bind(priority)
            .bind(rule.active)
            .bind(rule.trigger_event.as_str())
            .bind(rule.from_temperature.map(|t| t.as_str()))
            .bind(rule.from_substatus.map(|s| s.as_str()))
            .bind(rule.timer_minutes)
            .bind(rule.action.set_temperature.map(|t| t.as_str()))
            .bind(rule.action.clear_substatus)
            .bind(rule.action.set_substatus.map(|s| s.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Find a rule by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<TransitionRuleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM temperature_transition_rules \
             WHERE id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, TransitionRuleRow>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List rules in evaluation order, optionally including inactive ones.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<TransitionRuleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM temperature_transition_rules
             WHERE organization_id = $1 AND ($2 OR is_active = true)
             ORDER BY priority ASC, id ASC"
        );
        sqlx::query_as::<_, TransitionRuleRow>(&query)
            .bind(organization_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// List only active rules in evaluation order.
    pub async fn list_active(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<TransitionRuleRow>, sqlx::Error> {
        Self::list(pool, organization_id, false).await
    }

    /// Overwrite every editable column from an already-merged rule.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        rule: &TemperatureTransitionRule,
    ) -> Result<Option<TransitionRuleRow>, sqlx::Error> {
        let query = format!(
            "UPDATE temperature_transition_rules SET
                name = $3,
                priority = $4,
                is_active = $5,
                trigger_event = $6,
                from_temperature = $7,
                from_substatus = $8,
                timer_minutes = $9,
                action_set_temperature = $10,
                action_clear_substatus = $11,
                action_set_substatus = $12
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TransitionRuleRow>(&query)
            .bind(rule.id)
            .bind(organization_id)
            .bind(&rule.name)
            .bind(rule.priority)
            .bind(rule.active)
            .bind(rule.trigger_event.as_str())
            .bind(rule.from_temperature.map(|t| t.as_str()))
            .bind(rule.from_substatus.map(|s| s.as_str()))
            .bind(rule.timer_minutes)
            .bind(rule.action.set_temperature.map(|t| t.as_str()))
            .bind(rule.action.clear_substatus)
            .bind(rule.action.set_substatus.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a rule. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM temperature_transition_rules WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite priorities for a set of rules in one transaction.
    pub async fn reorder(
        pool: &PgPool,
        organization_id: DbId,
        priorities: &[(DbId, i32)],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (id, priority) in priorities {
            sqlx::query(
                "UPDATE temperature_transition_rules SET priority = $3 \
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
            "Rewrote transition rule priorities"
        );
        Ok(())
    }
}
