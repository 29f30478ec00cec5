//! Route definitions for the `/interest-triggers` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::interest_triggers;
use crate::state::AppState;

/// Routes mounted at `/organizations/{org_id}/interest-triggers`.
///
/// ```text
/// GET    /              -> list_triggers   (?include_inactive)
/// POST   /              -> create_trigger
/// PUT    /reorder       -> reorder_triggers
/// POST   /test          -> test_trigger_definition (dry-run)
/// POST   /match         -> match_triggers          (dry-run)
/// GET    /{id}          -> get_trigger
/// PUT    /{id}          -> update_trigger
/// DELETE /{id}          -> delete_trigger
/// POST   /{id}/test     -> test_stored_trigger     (dry-run)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(interest_triggers::list_triggers).post(interest_triggers::create_trigger),
        )
        .route("/reorder", put(interest_triggers::reorder_triggers))
        .route("/test", post(interest_triggers::test_trigger_definition))
        .route("/match", post(interest_triggers::match_triggers))
        .route(
            "/{id}",
            get(interest_triggers::get_trigger)
                .put(interest_triggers::update_trigger)
                .delete(interest_triggers::delete_trigger),
        )
        .route("/{id}/test", post(interest_triggers::test_stored_trigger))
}
