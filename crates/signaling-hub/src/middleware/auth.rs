//! Authentication middleware for protected routes.
//!
//! Extracts the bearer token from the `Authorization` header or the `token`
//! query parameter, verifies the HS256 signature, resolves the user record,
//! and injects it into request extensions.
//!
//! The query-parameter fallback exists for the WebSocket upgrade: browser and
//! desktop WebSocket clients cannot attach custom headers to the upgrade
//! request.

use crate::auth::jwt;
use crate::errors::HubError;
use crate::repositories::UsersRepository;
use crate::routes::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// Authentication middleware that validates bearer tokens.
///
/// # Response
///
/// - Returns 401 Unauthorized if the token is missing, invalid, or names an
///   unknown user
/// - Continues to the next handler with the `User` in extensions otherwise
#[instrument(skip(state, req, next), name = "hub.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HubError> {
    let header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());
    let query = req.uri().query();

    let token = extract_bearer(header, query).ok_or_else(|| {
        tracing::debug!(target: "hub.middleware.auth", "Missing bearer token");
        HubError::Unauthorized("Missing bearer token".to_string())
    })?;

    let claims = jwt::verify_session_token(&token, &state.config.session_secret)?;

    let user = UsersRepository::by_email(&state.pool, &claims.email)
        .await?
        .ok_or_else(|| {
            tracing::debug!(target: "hub.middleware.auth", "Token subject has no user record");
            HubError::Unauthorized("The access token is invalid or expired".to_string())
        })?;

    // Store the resolved user in request extensions for downstream handlers
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Pull a bearer token from the `Authorization` header, falling back to the
/// `token` query parameter.
fn extract_bearer(header: Option<&str>, query: Option<&str>) -> Option<String> {
    if let Some(token) = header.and_then(|h| h.strip_prefix("Bearer ")) {
        return Some(token.to_string());
    }

    query
        .and_then(token_from_query)
        .map(std::string::ToString::to_string)
}

/// Find the `token` parameter in a raw query string.
///
/// JWT characters are URL-safe, so no percent-decoding is required.
fn token_from_query(query: &str) -> Option<&str> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|token| !token.is_empty())
}
