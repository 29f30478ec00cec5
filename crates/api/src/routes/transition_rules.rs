//! Route definitions for the `/temperature-rules` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::transition_rules;
use crate::state::AppState;

/// Routes mounted at `/organizations/{org_id}/temperature-rules`.
///
/// ```text
/// GET    /              -> list_rules   (?include_inactive)
/// POST   /              -> create_rule
/// PUT    /reorder       -> reorder_rules
/// POST   /test          -> test_rule_definition (dry-run)
/// GET    /{id}          -> get_rule
/// PUT    /{id}          -> update_rule
/// DELETE /{id}          -> delete_rule
/// POST   /{id}/test     -> test_stored_rule     (dry-run)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(transition_rules::list_rules).post(transition_rules::create_rule),
        )
        .route("/reorder", put(transition_rules::reorder_rules))
        .route("/test", post(transition_rules::test_rule_definition))
        .route(
            "/{id}",
            get(transition_rules::get_rule)
                .put(transition_rules::update_rule)
                .delete(transition_rules::delete_rule),
        )
        .route("/{id}/test", post(transition_rules::test_stored_rule))
}
