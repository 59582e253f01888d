//! Media-room grant and anonymous token issuer.
//!
//! The issuer signs two unrelated credential families:
//!
//! - **SFU media grants**: HS256 JWTs the SFU accepts for joining a room.
//!   The issuer claim is the SFU API key, the subject is a
//!   `room:<room>:<user>:<track>` identity, and the `video` grant names the
//!   joinable room. Each call participant gets two grants (`:video` and
//!   `:audio`) scoped to the same room, valid for 24 hours; the SFU
//!   disconnects everyone when the room closes.
//! - **Anonymous room tokens**: hub-signed, 10-minute, purpose-scoped
//!   credentials handed to guests, traded at the meet-redirect endpoint for
//!   a 3-hour audio-only grant.
//!
//! Signing keys are read from configuration once at startup and immutable
//! afterwards.

use crate::config::Config;
use crate::errors::HubError;
use crate::models::User;
use common::jwt::AnonymousRoomClaims;
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of a call media grant.
const CALL_GRANT_TTL_SECS: i64 = 24 * 60 * 60;

/// Lifetime of a meet-redirect media grant.
const MEET_GRANT_TTL_SECS: i64 = 3 * 60 * 60;

/// A participant's media credentials for one room.
///
/// Token keys are camelCase on the wire; this struct is embedded verbatim in
/// both the `call_tokens` payload and the watercooler HTTP response.
#[derive(Debug, Clone, Serialize)]
pub struct TokenSet {
    #[serde(rename = "audioToken")]
    pub audio_token: String,
    #[serde(rename = "videoToken")]
    pub video_token: String,
    /// The peer this set was minted against (the other participant).
    pub participant: String,
}

/// Claims of an SFU media grant.
#[derive(Debug, Serialize, Deserialize)]
struct MediaGrantClaims {
    /// SFU API key.
    iss: String,
    /// Identity: `room:<room>:<user id>:(video|audio)`.
    sub: String,
    /// Display name shown in the room; absent on anonymous grants.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    nbf: i64,
    exp: i64,
    video: VideoGrant,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoGrant {
    room_join: bool,
    room: String,
}

/// The per-team always-available room name.
#[must_use]
pub fn watercooler_room(team_id: i64) -> String {
    format!("team-{team_id}-watercooler")
}

/// Signs media grants and anonymous room tokens.
///
/// Cheaply cloneable; keys are immutable after startup.
#[derive(Clone)]
pub struct TokenIssuer {
    sfu_api_key: String,
    sfu_api_secret: SecretString,
    session_secret: SecretString,
}

impl TokenIssuer {
    /// Build an issuer from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            sfu_api_key: config.livekit_api_key.clone(),
            sfu_api_secret: config.livekit_api_secret.clone(),
            session_secret: config.session_secret.clone(),
        }
    }

    /// Mint the audio and video grants one participant needs to join a room.
    ///
    /// `participant` is the peer's user id, echoed back so the client knows
    /// who the credentials pair it with.
    ///
    /// # Errors
    ///
    /// Returns `HubError::TokenSigning` if signing fails.
    pub fn mint_call_grants(
        &self,
        room: &str,
        user: &User,
        participant: &str,
    ) -> Result<TokenSet, HubError> {
        let now = chrono::Utc::now().timestamp();

        let video_token = self.sign_media_grant(&MediaGrantClaims {
            iss: self.sfu_api_key.clone(),
            sub: format!("room:{room}:{}:video", user.id),
            name: Some(format!("{} video", user.display_name())),
            nbf: now,
            exp: now + CALL_GRANT_TTL_SECS,
            video: VideoGrant {
                room_join: true,
                room: room.to_string(),
            },
        })?;

        let audio_token = self.sign_media_grant(&MediaGrantClaims {
            iss: self.sfu_api_key.clone(),
            sub: format!("room:{room}:{}:audio", user.id),
            name: Some(format!("{} audio", user.display_name())),
            nbf: now,
            exp: now + CALL_GRANT_TTL_SECS,
            video: VideoGrant {
                room_join: true,
                room: room.to_string(),
            },
        })?;

        Ok(TokenSet {
            audio_token,
            video_token,
            participant: participant.to_string(),
        })
    }

    /// Mint the single audio grant behind a meet redirect.
    ///
    /// # Errors
    ///
    /// Returns `HubError::TokenSigning` if signing fails.
    pub fn mint_meet_grant(&self, room: &str, identity_owner: &str) -> Result<String, HubError> {
        let now = chrono::Utc::now().timestamp();

        self.sign_media_grant(&MediaGrantClaims {
            iss: self.sfu_api_key.clone(),
            sub: format!("room:{room}:{identity_owner}:audio"),
            name: None,
            nbf: now,
            exp: now + MEET_GRANT_TTL_SECS,
            video: VideoGrant {
                room_join: true,
                room: room.to_string(),
            },
        })
    }

    /// Mint a 10-minute anonymous watercooler token for a team.
    ///
    /// # Errors
    ///
    /// Returns `HubError::TokenSigning` if signing fails.
    pub fn mint_anonymous_redirect(&self, team_id: i64) -> Result<String, HubError> {
        let claims = AnonymousRoomClaims::new(team_id, chrono::Utc::now().timestamp());

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.session_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| HubError::TokenSigning(e.to_string()))
    }

    /// Verify an anonymous watercooler token and return its team id.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Unauthorized` when the signature is bad, the token
    /// has expired, or the purpose claim is not the watercooler purpose.
    pub fn verify_anonymous_redirect(&self, token: &str) -> Result<i64, HubError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<AnonymousRoomClaims>(
            token,
            &DecodingKey::from_secret(self.session_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(target: "hub.tokens", error = %e, "Anonymous token verification failed");
            HubError::Unauthorized("Invalid token".to_string())
        })?;

        if !token_data.claims.has_watercooler_purpose() {
            tracing::debug!(
                target: "hub.tokens",
                purpose = %token_data.claims.purpose,
                "Anonymous token rejected: wrong purpose"
            );
            return Err(HubError::Unauthorized("Invalid token purpose".to_string()));
        }

        Ok(token_data.claims.team_id)
    }

    fn sign_media_grant(&self, claims: &MediaGrantClaims) -> Result<String, HubError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.sfu_api_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| HubError::TokenSigning(e.to_string()))
    }
}
