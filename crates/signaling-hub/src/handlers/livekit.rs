//! SFU discovery handler.

use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Response for `/api/auth/livekit/server-url`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerUrlResponse {
    pub url: String,
}

/// Handler for GET /api/auth/livekit/server-url
///
/// Tells clients which SFU their grants are valid against.
#[instrument(skip_all, name = "hub.handlers.livekit")]
pub async fn livekit_server_url(State(state): State<Arc<AppState>>) -> Json<ServerUrlResponse> {
    Json(ServerUrlResponse {
        url: state.config.livekit_server_url.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_response_serialization() {
        let response = ServerUrlResponse {
            url: "wss://sfu.example.com".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, "{\"url\":\"wss://sfu.example.com\"}");
    }
}
