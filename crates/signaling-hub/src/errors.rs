//! Signaling hub error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse`
//! impl. Error messages returned to clients are intentionally generic to
//! avoid leaking internal details; actual errors are logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Signaling hub error type.
///
/// Maps to appropriate HTTP status codes:
/// - Database, Bus, TokenSigning, Internal: 500 Internal Server Error
/// - Unauthorized: 401 Unauthorized
/// - NotFound: 404 Not Found
/// - BadRequest: 400 Bad Request
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Bus error: {0}")]
    Bus(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Internal server error")]
    Internal,
}

impl HubError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            HubError::Database(_)
            | HubError::Bus(_)
            | HubError::TokenSigning(_)
            | HubError::Internal => 500,
            HubError::Unauthorized(_) => 401,
            HubError::NotFound(_) => 404,
            HubError::BadRequest(_) => 400,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            HubError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "hub.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            HubError::Bus(err) => {
                tracing::error!(target: "hub.bus", error = %err, "Pub/sub operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BUS_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            HubError::TokenSigning(err) => {
                tracing::error!(target: "hub.tokens", error = %err, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TOKEN_ERROR",
                    "Failed to generate tokens".to_string(),
                )
            }
            HubError::Unauthorized(reason) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", reason.clone())
            }
            HubError::NotFound(resource) => (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone()),
            HubError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            HubError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"signaling-hub\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

/// Convert sqlx errors to `HubError`
impl From<sqlx::Error> for HubError {
    fn from(err: sqlx::Error) -> Self {
        HubError::Database(err.to_string())
    }
}

/// Convert redis errors to `HubError`
impl From<::redis::RedisError> for HubError {
    fn from(err: ::redis::RedisError) -> Self {
        HubError::Bus(err.to_string())
    }
}
