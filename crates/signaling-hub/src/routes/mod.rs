//! HTTP routes for the signaling hub.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::auth::require_auth;
use crate::redis::SignalBus;
use crate::services::tokens::TokenIssuer;
use axum::{routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers and sessions.
///
/// Everything in here is process-wide, initialized once at startup, and
/// immutable (or internally synchronized) afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only user/team store).
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Redis pub/sub fabric.
    pub bus: SignalBus,

    /// Media grant and anonymous token issuer.
    pub tokens: TokenIssuer,
}

/// Build the application routes.
///
/// - Public: health check and the token-gated meet redirect
/// - Protected (bearer token): the WebSocket endpoint, user/teammate reads,
///   and the watercooler token endpoints
/// - Debug (only when configured): token minting helpers
///
/// Layer order (bottom-to-top execution): timeout, trace, CORS.
pub fn build_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health_check))
        .route(
            "/api/watercooler/meet-redirect",
            get(handlers::meet_redirect),
        );

    let protected_routes = Router::new()
        .route("/api/auth/websocket", get(handlers::websocket))
        .route("/api/auth/user", get(handlers::current_user))
        .route("/api/auth/teammates", get(handlers::teammates))
        .route("/api/auth/watercooler", get(handlers::watercooler))
        .route(
            "/api/auth/watercooler/anonymous",
            get(handlers::watercooler_anonymous),
        )
        .route(
            "/api/auth/livekit/server-url",
            get(handlers::livekit_server_url),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let debug_routes = if state.config.debug {
        Router::new()
            .route("/api/debug/jwt", get(handlers::debug_jwt))
            .route("/api/debug/call-token", get(handlers::debug_call_token))
    } else {
        Router::new()
    };

    public_routes
        .merge(protected_routes)
        .merge(debug_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
