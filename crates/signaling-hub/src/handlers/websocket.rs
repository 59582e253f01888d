//! WebSocket upgrade handler.

use crate::models::User;
use crate::routes::AppState;
use crate::signaling::session;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use axum::Extension;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /api/auth/websocket
///
/// Authentication already happened in the middleware; a failed bearer check
/// rejects the upgrade with 401 before any session state is allocated. On
/// upgrade the connection is handed to a signaling session, which lives
/// until the socket or its bus subscription goes away.
#[instrument(skip_all, name = "hub.handlers.websocket", fields(user_id = %user.id))]
pub async fn websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Response {
    ws.on_upgrade(move |socket| session::run(socket, user, state))
}
