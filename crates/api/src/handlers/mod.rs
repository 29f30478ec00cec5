//! Request handlers for the lead automation resources.
//!
//! Each submodule provides the async handlers for one resource. Handlers
//! delegate persistence to the repositories in `odonto_db`, decisions to
//! `odonto_core`, and map errors via [`AppError`](crate::error::AppError).

pub mod interest_triggers;
pub mod leads;
pub mod transition_rules;

use odonto_core::error::CoreError;
use odonto_core::types::DbId;
use odonto_db::repositories::OrganizationRepo;

use crate::error::{AppError, AppResult};

/// Verify that an organization exists before writing rows that reference it.
async fn ensure_organization_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    OrganizationRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id,
        }))
}
