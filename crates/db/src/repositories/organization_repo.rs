//! Repository for the `organizations` table.

use odonto_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{CreateOrganization, Organization};

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Minimal access to organizations; tenant management lives elsewhere.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!("INSERT INTO organizations (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find an organization by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
