//! Watercooler room handlers.
//!
//! Every team has one always-available SFU room named
//! `team-<team id>-watercooler`. Members join it with a full token set;
//! guests go through a two-step anonymous flow: an authenticated member
//! mints a 10-minute redirect token, and the public meet-redirect endpoint
//! trades it for a 3-hour audio-only grant embedded in a redirect to the
//! SFU's hosted client.

use crate::errors::HubError;
use crate::models::User;
use crate::repositories::TeamsRepository;
use crate::routes::AppState;
use crate::services::tokens::{watercooler_room, TokenSet};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// The SFU's hosted meet client; guests land here with their grant in the
/// query string.
const MEET_CLIENT_URL: &str = "https://meet.livekit.io/custom";

/// Response for the anonymous link endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RedirectUrlResponse {
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
pub struct MeetRedirectQuery {
    pub token: Option<String>,
}

/// Handler for GET /api/auth/watercooler
///
/// Mints a full token set for the caller's team watercooler room.
#[instrument(skip_all, name = "hub.handlers.watercooler", fields(user_id = %user.id))]
pub async fn watercooler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<TokenSet>, HubError> {
    let team_id = user
        .team_id
        .ok_or_else(|| HubError::BadRequest("User is not part of any team".to_string()))?;

    let room = watercooler_room(team_id);
    let tokens = state.tokens.mint_call_grants(&room, &user, &user.id)?;

    Ok(Json(tokens))
}

/// Handler for GET /api/auth/watercooler/anonymous
///
/// Mints a 10-minute redirect token scoped to the caller's team and returns
/// the guest link that carries it.
#[instrument(skip_all, name = "hub.handlers.watercooler_anonymous", fields(user_id = %user.id))]
pub async fn watercooler_anonymous(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<RedirectUrlResponse>, HubError> {
    let team_id = user
        .team_id
        .ok_or_else(|| HubError::BadRequest("User is not part of any team".to_string()))?;

    TeamsRepository::by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| HubError::NotFound("Team not found".to_string()))?;

    let token = state.tokens.mint_anonymous_redirect(team_id)?;

    Ok(Json(RedirectUrlResponse {
        redirect_url: format!("/api/watercooler/meet-redirect?token={token}"),
    }))
}

/// Handler for GET /api/watercooler/meet-redirect
///
/// Public endpoint: validates the redirect token (signature, expiry,
/// purpose), mints a fresh anonymous identity and a 3-hour audio grant for
/// the team's watercooler room, and 302-redirects to the SFU's hosted
/// client.
#[instrument(skip_all, name = "hub.handlers.meet_redirect")]
pub async fn meet_redirect(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MeetRedirectQuery>,
) -> Result<Response, HubError> {
    let token = query
        .token
        .ok_or_else(|| HubError::BadRequest("Missing token parameter".to_string()))?;

    let team_id = state.tokens.verify_anonymous_redirect(&token)?;

    let room = watercooler_room(team_id);
    let identity_owner = format!("anonymous-{}", random_suffix());
    let grant = state.tokens.mint_meet_grant(&room, &identity_owner)?;

    let location = format!(
        "{MEET_CLIENT_URL}?liveKitUrl={}&token={grant}",
        state.config.livekit_server_url
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Four random alphanumeric characters naming an anonymous guest.
fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect()
}
