pub mod health;
pub mod interest_triggers;
pub mod leads;
pub mod transition_rules;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /organizations/{org_id}/interest-triggers            list, create
/// /organizations/{org_id}/interest-triggers/{id}       get, update, delete
/// /organizations/{org_id}/interest-triggers/reorder    rewrite priorities (PUT)
/// /organizations/{org_id}/interest-triggers/{id}/test  test stored trigger (POST)
/// /organizations/{org_id}/interest-triggers/test       test unsaved trigger (POST)
/// /organizations/{org_id}/interest-triggers/match      run matcher (POST)
///
/// /organizations/{org_id}/temperature-rules            list, create
/// /organizations/{org_id}/temperature-rules/{id}       get, update, delete
/// /organizations/{org_id}/temperature-rules/reorder    rewrite priorities (PUT)
/// /organizations/{org_id}/temperature-rules/{id}/test  test stored rule (POST)
/// /organizations/{org_id}/temperature-rules/test       test unsaved rule (POST)
///
/// /organizations/{org_id}/leads/{id}                   get
/// /organizations/{org_id}/leads/{id}/classify          apply winning trigger (POST)
/// /organizations/{org_id}/leads/{id}/evaluate          first matching rule (POST, ?apply)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/organizations/{org_id}/interest-triggers",
            interest_triggers::router(),
        )
        .nest(
            "/organizations/{org_id}/temperature-rules",
            transition_rules::router(),
        )
        .nest("/organizations/{org_id}/leads", leads::router())
}
