//! Bearer token issue and verification.
//!
//! Bearer tokens are HS256 JWTs with an email subject and a one-year
//! expiration, signed with the hub session secret. The account surface mints
//! them at sign-in; the hub verifies them on every authenticated request and
//! can mint them itself through the debug endpoints.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Verification uses zero leeway; an expired token is expired
//! - Error messages are generic to prevent information leakage; details are
//!   logged at debug level

use crate::errors::HubError;
use common::jwt::{SessionClaims, MAX_JWT_SIZE_BYTES, SESSION_TOKEN_TTL};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Generic message returned for every verification failure.
const INVALID_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

/// Mint a bearer token for an email subject.
///
/// # Errors
///
/// Returns `HubError::TokenSigning` if encoding fails.
pub fn issue_session_token(email: &str, secret: &SecretString) -> Result<String, HubError> {
    let claims = SessionClaims {
        email: email.to_string(),
        exp: chrono::Utc::now().timestamp()
            + i64::try_from(SESSION_TOKEN_TTL.as_secs()).unwrap_or(i64::MAX),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| HubError::TokenSigning(e.to_string()))
}

/// Verify a bearer token and return its claims.
///
/// # Errors
///
/// Returns `HubError::Unauthorized` with a generic message for every
/// validation failure (oversized, malformed, bad signature, expired).
pub fn verify_session_token(token: &str, secret: &SecretString) -> Result<SessionClaims, HubError> {
    // Check token size BEFORE any parsing (DoS prevention)
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "hub.auth.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(HubError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(target: "hub.auth.jwt", error = %e, "Token verification failed");
        HubError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    })?;

    Ok(token_data.claims)
}
