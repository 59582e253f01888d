//! Debug token endpoints.
//!
//! Only mounted when `ENABLE_DEBUG_ENDPOINTS=true`; they mint real
//! credentials and must never be exposed in production.

use crate::auth::jwt;
use crate::errors::HubError;
use crate::repositories::UsersRepository;
use crate::routes::AppState;
use crate::services::tokens::TokenSet;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Response for the debug bearer-token endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DebugTokenResponse {
    pub email: String,
    pub token: String,
}

/// Handler for GET /api/debug/jwt
///
/// Mints a bearer token for an arbitrary email.
#[instrument(skip_all, name = "hub.handlers.debug_jwt")]
pub async fn debug_jwt(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<DebugTokenResponse>, HubError> {
    let token = jwt::issue_session_token(&query.email, &state.config.session_secret)?;

    Ok(Json(DebugTokenResponse {
        email: query.email,
        token,
    }))
}

/// Handler for GET /api/debug/call-token
///
/// Mints a media token set for an existing user against a throwaway room.
#[instrument(skip_all, name = "hub.handlers.debug_call_token")]
pub async fn debug_call_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<TokenSet>, HubError> {
    let user = UsersRepository::by_email(&state.pool, &query.email)
        .await?
        .ok_or_else(|| HubError::NotFound("User not found".to_string()))?;

    let room = Uuid::new_v4().to_string();
    let tokens = state.tokens.mint_call_grants(&room, &user, &user.id)?;

    Ok(Json(tokens))
}
