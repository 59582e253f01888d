//! Health check handler.

use crate::errors::HubError;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Response for `/api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the database is reachable, "unhealthy" otherwise.
    pub status: String,
    /// Database reachability.
    pub database: String,
}

/// Handler for GET /api/health
///
/// Pings the database and reports the service status. An unhealthy database
/// still yields a 200 response so orchestrators see the body.
#[instrument(skip_all, name = "hub.handlers.health")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, HubError> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let status = if db_healthy { "healthy" } else { "unhealthy" };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        database: status.to_string(),
    }))
}
