//! Call-setup coordination.
//!
//! The hub holds no state between requests; the setup context (caller,
//! callee, room id) lives only inside [`accept`], from the arrival of
//! `call_accept` to the publication of both token messages:
//!
//! ```text
//!         call_request            call_accept
//! IDLE ----------------> RINGING -------------> ACCEPTING --mint ok--> ACTIVE
//!   |                       |                       |
//!   | callee_offline        | call_reject           | mint/load failure
//!   v                       v                       v
//!  DONE                  REJECTED            error to both, context dropped
//! ```
//!
//! `ACTIVE -> ENDED` is peer-driven: either side publishes `call_end` to the
//! other; the hub runs no call timer. A `call_accept` without a prior
//! `call_request` still mints when both user records exist; the client
//! mediates the protocol.

use crate::repositories::UsersRepository;
use crate::routes::AppState;
use crate::services::tokens::TokenSet;
use crate::signaling::messages::SignalMessage;
use crate::signaling::router;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Drive an accepted call to ACTIVE: forward the acceptance, allocate a
/// room, mint both parties' media grants, and publish them.
///
/// Any failure publishes a common `error` to both channels and discards the
/// setup context; a one-sided `call_tokens` is never published.
#[instrument(skip_all, fields(callee_id = %callee_id, caller_id = %caller_id))]
pub async fn accept(state: &AppState, callee_id: &str, caller_id: &str) {
    // The caller learns of the acceptance first, mirroring the client's
    // setup handshake.
    router::forward_to(
        state,
        caller_id,
        &SignalMessage::CallAccept {
            caller_id: caller_id.to_string(),
        },
    )
    .await;

    let caller = match UsersRepository::by_id(&state.pool, caller_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(target: "hub.signaling.call", caller_id = %caller_id, "Caller record not found");
            fail_both(state, "Failed to get caller", caller_id, callee_id).await;
            return;
        }
        Err(e) => {
            error!(target: "hub.signaling.call", error = %e, "Failed to load caller");
            fail_both(state, "Failed to get caller", caller_id, callee_id).await;
            return;
        }
    };

    let callee = match UsersRepository::by_id(&state.pool, callee_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(target: "hub.signaling.call", callee_id = %callee_id, "Callee record not found");
            fail_both(state, "Failed to get callee", caller_id, callee_id).await;
            return;
        }
        Err(e) => {
            error!(target: "hub.signaling.call", error = %e, "Failed to load callee");
            fail_both(state, "Failed to get callee", caller_id, callee_id).await;
            return;
        }
    };

    let room_id = Uuid::new_v4().to_string();
    info!(
        target: "hub.signaling.call",
        room_id = %room_id,
        caller_id = %caller.id,
        callee_id = %callee.id,
        "Creating media room"
    );

    let callee_tokens = state.tokens.mint_call_grants(&room_id, &callee, &caller.id);
    let caller_tokens = state.tokens.mint_call_grants(&room_id, &caller, &callee.id);

    let (caller_tokens, callee_tokens) = match (caller_tokens, callee_tokens) {
        (Ok(caller_tokens), Ok(callee_tokens)) => (caller_tokens, callee_tokens),
        (Err(e), _) | (_, Err(e)) => {
            error!(target: "hub.signaling.call", error = %e, room_id = %room_id, "Token mint failed");
            fail_both(state, "Failed to generate tokens", caller_id, callee_id).await;
            return;
        }
    };

    router::forward_to(state, &caller.id, &call_tokens_message(caller_tokens)).await;
    router::forward_to(state, &callee.id, &call_tokens_message(callee_tokens)).await;
}

fn call_tokens_message(tokens: TokenSet) -> SignalMessage {
    SignalMessage::CallTokens {
        audio_token: tokens.audio_token,
        video_token: tokens.video_token,
        participant: tokens.participant,
    }
}

/// Publish a common error to both parties of a failed setup.
async fn fail_both(state: &AppState, error: &str, caller_id: &str, callee_id: &str) {
    for user_id in [caller_id, callee_id] {
        router::forward_to(
            state,
            user_id,
            &SignalMessage::Error {
                error: error.to_string(),
            },
        )
        .await;
    }
}
