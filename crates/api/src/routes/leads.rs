use axum::routing::{get, post};
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/organizations/{org_id}/leads`.
///
/// ```text
/// GET    /{id}            -> get_lead
/// POST   /{id}/classify   -> classify_lead
/// POST   /{id}/evaluate   -> evaluate_lead  (?apply)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(leads::get_lead))
        .route("/{id}/classify", post(leads::classify_lead))
        .route("/{id}/evaluate", post(leads::evaluate_lead))
}
