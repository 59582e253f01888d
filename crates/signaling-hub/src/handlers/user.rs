//! Current user handler.

use crate::models::User;
use axum::{Extension, Json};
use tracing::instrument;

/// Handler for GET /api/auth/user
///
/// Returns the authenticated user's record as resolved by the auth
/// middleware.
#[instrument(skip_all, name = "hub.handlers.user")]
pub async fn current_user(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
