//! Teammates handler.

use crate::errors::HubError;
use crate::models::User;
use crate::repositories::UsersRepository;
use crate::routes::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, warn};

/// A teammate annotated with their live presence.
#[derive(Debug, Clone, Serialize)]
pub struct TeammatePresence {
    #[serde(flatten)]
    pub user: User,
    /// Whether the teammate holds at least one live session anywhere in the
    /// cluster right now.
    pub is_active: bool,
}

/// Handler for GET /api/auth/teammates
///
/// Returns the members of the caller's team, each annotated with
/// `is_active` computed from the presence registry. A failed presence
/// lookup reports the teammate as inactive rather than failing the request.
#[instrument(skip_all, name = "hub.handlers.teammates")]
pub async fn teammates(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TeammatePresence>>, HubError> {
    let teammates = UsersRepository::teammates_of(&state.pool, &user).await?;

    let mut annotated = Vec::with_capacity(teammates.len());
    for teammate in teammates {
        let is_active = match state.bus.is_present(&teammate.id).await {
            Ok(present) => present,
            Err(e) => {
                warn!(
                    target: "hub.handlers.teammates",
                    error = %e,
                    teammate_id = %teammate.id,
                    "Presence lookup failed"
                );
                false
            }
        };
        annotated.push(TeammatePresence {
            user: teammate,
            is_active,
        });
    }

    Ok(Json(annotated))
}
