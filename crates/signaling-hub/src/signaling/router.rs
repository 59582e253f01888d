//! Routing of client intents onto the bus.
//!
//! The router turns inbound WebSocket intents into publishes on the
//! recipient's channel. It never retries: pub/sub is best-effort and a missed
//! message surfaces as a user-visible non-response that the client's own
//! timeouts handle.

use crate::models::User;
use crate::routes::AppState;
use crate::signaling::messages::SignalMessage;
use crate::signaling::session::{enqueue, OutboundSender};
use tracing::{instrument, warn};

/// Handle a `call_request` from a connected caller.
///
/// If the callee has no live session anywhere in the cluster, nothing is
/// published; the caller gets `callee_offline` directly on their own socket
/// so a dead channel is never rung. A failed presence lookup counts as
/// offline for the same reason.
#[instrument(skip_all, fields(caller_id = %caller.id, callee_id = %callee_id))]
pub async fn initiate_call(
    state: &AppState,
    caller: &User,
    callee_id: &str,
    outbound: &OutboundSender,
) {
    let present = match state.bus.is_present(callee_id).await {
        Ok(present) => present,
        Err(e) => {
            warn!(
                target: "hub.signaling.router",
                error = %e,
                callee_id = %callee_id,
                "Presence lookup failed; treating callee as offline"
            );
            false
        }
    };

    if !present {
        enqueue(
            outbound,
            &SignalMessage::CalleeOffline {
                callee_id: callee_id.to_string(),
            },
        )
        .await;
        return;
    }

    forward_to(
        state,
        callee_id,
        &SignalMessage::IncomingCall {
            caller_id: caller.id.clone(),
        },
    )
    .await;
}

/// Publish a message on a user's channel.
///
/// Errors are logged and swallowed; the affected message is simply lost.
pub async fn forward_to(state: &AppState, user_id: &str, message: &SignalMessage) {
    if let Err(e) = state.bus.publish_to_user(user_id, message).await {
        warn!(
            target: "hub.signaling.router",
            error = %e,
            user_id = %user_id,
            tag = message.tag(),
            "Dropping undeliverable publish"
        );
    }
}
