//! JWT claim types shared across the hub's credential flows.
//!
//! The hub signs and verifies three families of HS256 tokens:
//!
//! - **Bearer tokens** ([`SessionClaims`]): minted by the account surface and
//!   consumed on every authenticated request, including the WebSocket upgrade.
//! - **Anonymous room tokens** ([`AnonymousRoomClaims`]): short-lived,
//!   purpose-scoped credentials a guest trades for an SFU grant.
//! - **Media grants**: SFU-shaped tokens, owned by the hub's token issuer and
//!   not shared here.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing ([`MAX_JWT_SIZE_BYTES`])
//! - The `email` subject in [`SessionClaims`] is redacted in Debug output
//! - Purpose scoping prevents an anonymous room token from standing in for a
//!   bearer token even though both are signed with the same secret

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Oversized tokens are rejected before any base64 decode or signature work,
/// bounding the resources an unauthenticated caller can consume.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Lifetime of a hub bearer token (1 year).
pub const SESSION_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Lifetime of an anonymous room redirect token (10 minutes).
pub const ANONYMOUS_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// The only purpose value accepted for anonymous room tokens.
pub const ANONYMOUS_WATERCOOLER_PURPOSE: &str = "anonymous_watercooler";

/// Claims carried by a hub bearer token.
///
/// The subject is the account email; user records are resolved from it on
/// each request. Expiration is the only registered claim the hub relies on.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account email (subject) - redacted in Debug output.
    pub email: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("email", &"[REDACTED]")
            .field("exp", &self.exp)
            .finish()
    }
}

/// Claims carried by an anonymous watercooler redirect token.
///
/// Signed with the hub session secret. The `purpose` claim scopes the token
/// to the meet-redirect endpoint; verification rejects any other value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymousRoomClaims {
    /// Team whose watercooler room the guest may join.
    pub team_id: i64,

    /// Token purpose; must equal [`ANONYMOUS_WATERCOOLER_PURPOSE`].
    pub purpose: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl AnonymousRoomClaims {
    /// Build claims for a team, issued at `now` (Unix epoch seconds).
    #[must_use]
    pub fn new(team_id: i64, now: i64) -> Self {
        Self {
            team_id,
            purpose: ANONYMOUS_WATERCOOLER_PURPOSE.to_string(),
            iat: now,
            exp: now + i64::try_from(ANONYMOUS_TOKEN_TTL.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Check the purpose claim against the watercooler purpose.
    #[must_use]
    pub fn has_watercooler_purpose(&self) -> bool {
        self.purpose == ANONYMOUS_WATERCOOLER_PURPOSE
    }
}
