//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every query on tenant data
//! is scoped by `organization_id`.

pub mod interest_trigger_repo;
pub mod lead_repo;
pub mod organization_repo;
pub mod transition_rule_repo;

pub use interest_trigger_repo::InterestTriggerRepo;
pub use lead_repo::LeadRepo;
pub use organization_repo::OrganizationRepo;
pub use transition_rule_repo::TransitionRuleRepo;
