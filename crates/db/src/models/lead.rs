//! Lead entity model and DTOs.
//!
//! Only the columns the automation reads or writes are modelled here.

use odonto_core::error::CoreError;
use odonto_core::lead::{parse_optional_substatus, LeadState, Temperature};
use odonto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub temperature: String,
    pub hot_substatus: Option<String>,
    pub status: String,
    pub interest_id: Option<DbId>,
    pub source_id: Option<DbId>,
    pub last_interaction_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    /// Current temperature/substatus as typed values.
    pub fn state(&self) -> Result<LeadState, CoreError> {
        Ok(LeadState {
            temperature: Temperature::from_str(&self.temperature)?,
            substatus: parse_optional_substatus(self.hot_substatus.as_deref())?,
        })
    }
}

/// DTO for creating a new lead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLead {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub phone: Option<String>,
    pub temperature: Option<Temperature>,
    pub status: Option<String>,
    pub last_interaction_at: Option<Timestamp>,
}
