//! Liveness and database reachability, mounted at the root (`/health`).

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_db_check(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// The service answers 200 even when degraded so load balancers can tell a
/// dead process from a lost database.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let check = odonto_db::health_check(&state.pool).await;
    if let Err(e) = &check {
        tracing::warn!(error = %e, "Health check could not reach the database");
    }
    Json(HealthResponse::from_db_check(check.is_ok()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
