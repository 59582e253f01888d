//! Wire codec for signaling messages.
//!
//! Every frame is a UTF-8 JSON object `{"type": <tag>, "payload": {...}}`.
//! The same encoding is used on the WebSocket and on the pub/sub bus, so a
//! session can forward published bytes to its socket verbatim.
//!
//! The tag list below is the authoritative wire contract; any change to it is
//! a wire break.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A signaling message, tagged by `type` with the payload under `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SignalMessage {
    /// S->C: connection established.
    Success { message: String },
    /// S->C: something went wrong; the session stays open.
    Error { error: String },
    /// C->S: client liveness probe.
    Ping { message: String },
    /// S->C: answer to a ping, never routed through the bus.
    Pong { message: String },
    /// C->S: ask the hub to ring a teammate.
    CallRequest { callee_id: String },
    /// S->C: somebody is ringing this user.
    IncomingCall { caller_id: String },
    /// S->C: the requested callee has no live session anywhere.
    CalleeOffline { callee_id: String },
    /// C->S and S->C: the callee picked up.
    CallAccept { caller_id: String },
    /// C->S and S->C: the callee declined.
    CallReject { caller_id: String },
    /// S->C: media-room credentials for an accepted call.
    CallTokens {
        #[serde(rename = "audioToken")]
        audio_token: String,
        #[serde(rename = "videoToken")]
        video_token: String,
        participant: String,
    },
    /// C->S and S->C: either side hung up.
    CallEnd { participant_id: String },
    /// C->S and S->C: a teammate came online.
    TeammateOnline { teammate_id: String },
}

/// Tags the hub understands. An inbound frame with any other tag decodes to
/// [`Decoded::Unknown`] and is skipped rather than treated as an error.
const KNOWN_TAGS: [&str; 12] = [
    "success",
    "error",
    "ping",
    "pong",
    "call_request",
    "incoming_call",
    "callee_offline",
    "call_accept",
    "call_reject",
    "call_tokens",
    "call_end",
    "teammate_online",
];

/// Result of decoding an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A well-formed message with a known tag.
    Message(SignalMessage),
    /// A structurally valid frame whose tag the hub does not know; carried
    /// so the session can log it before dropping the frame.
    Unknown(String),
}

/// Codec failures; both are answered with an `error` frame on the socket
/// while the session continues.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame is not a JSON object with a string `type`.
    #[error("failed to parse message envelope: {0}")]
    Envelope(String),

    /// The tag is known but the payload has the wrong shape.
    #[error("invalid payload for \"{tag}\": {detail}")]
    Payload { tag: String, detail: String },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    tag: String,
}

/// Decode one inbound text frame.
///
/// # Errors
///
/// Returns `CodecError` for frames without a valid envelope or with a
/// malformed payload for a known tag.
pub fn decode(text: &str) -> Result<Decoded, CodecError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| CodecError::Envelope(e.to_string()))?;

    if !KNOWN_TAGS.contains(&envelope.tag.as_str()) {
        return Ok(Decoded::Unknown(envelope.tag));
    }

    let message: SignalMessage = serde_json::from_str(text).map_err(|e| CodecError::Payload {
        tag: envelope.tag,
        detail: e.to_string(),
    })?;

    Ok(Decoded::Message(message))
}

impl SignalMessage {
    /// The wire tag of this message.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            SignalMessage::Success { .. } => "success",
            SignalMessage::Error { .. } => "error",
            SignalMessage::Ping { .. } => "ping",
            SignalMessage::Pong { .. } => "pong",
            SignalMessage::CallRequest { .. } => "call_request",
            SignalMessage::IncomingCall { .. } => "incoming_call",
            SignalMessage::CalleeOffline { .. } => "callee_offline",
            SignalMessage::CallAccept { .. } => "call_accept",
            SignalMessage::CallReject { .. } => "call_reject",
            SignalMessage::CallTokens { .. } => "call_tokens",
            SignalMessage::CallEnd { .. } => "call_end",
            SignalMessage::TeammateOnline { .. } => "teammate_online",
        }
    }

    /// Whether a message received on the user's channel is forwarded to the
    /// WebSocket. Everything else on the bus is ignored.
    ///
    /// `error` is forwarded so a failed call setup reaches both parties and
    /// never strands one side waiting for tokens.
    #[must_use]
    pub fn is_bus_forwardable(&self) -> bool {
        matches!(
            self,
            SignalMessage::IncomingCall { .. }
                | SignalMessage::CallReject { .. }
                | SignalMessage::CallAccept { .. }
                | SignalMessage::CallTokens { .. }
                | SignalMessage::CallEnd { .. }
                | SignalMessage::TeammateOnline { .. }
                | SignalMessage::Error { .. }
        )
    }

    /// The standard pong reply.
    #[must_use]
    pub fn pong() -> Self {
        SignalMessage::Pong {
            message: "pong".to_string(),
        }
    }
}
