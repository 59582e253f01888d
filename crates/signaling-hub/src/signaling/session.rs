//! Per-connection WebSocket session.
//!
//! A session exclusively owns one authenticated WebSocket and one
//! subscription on the user's channel, and bridges them until either side
//! goes away:
//!
//! - the **read loop** decodes client frames and dispatches them by tag;
//! - the **bus loop** forwards published bytes to the socket, filtered to
//!   the routable message set;
//! - a single **writer task** drains the bounded outbound queue, so frames
//!   hit the wire in enqueue order no matter which loop produced them.
//!
//! One `CancellationToken` ties the three together: socket close, write
//! failure, or a dropped subscription cancels everything, and teardown
//! releases the subscription, which is what flips the user's presence off.
//!
//! Backpressure: the outbound queue is bounded; when a slow consumer fills
//! it, producers block and, once the stalled write fails, the session closes
//! instead of buffering without limit.

use crate::models::User;
use crate::redis::UserSubscription;
use crate::repositories::UsersRepository;
use crate::routes::AppState;
use crate::signaling::messages::{self, Decoded, SignalMessage};
use crate::signaling::{call, router};
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Depth of the per-session outbound queue.
pub const OUTBOUND_QUEUE_DEPTH: usize = 64;

/// Sending half of a session's outbound queue. Payloads are already-encoded
/// JSON frames.
pub type OutboundSender = mpsc::Sender<String>;

/// Encode a message onto the outbound queue.
///
/// Returns `false` when the session is shutting down and the frame was
/// dropped.
pub(crate) async fn enqueue(outbound: &OutboundSender, message: &SignalMessage) -> bool {
    let Ok(payload) = serde_json::to_string(message) else {
        warn!(
            target: "hub.signaling.session",
            tag = message.tag(),
            "Failed to encode outbound message"
        );
        return false;
    };
    outbound.send(payload).await.is_ok()
}

fn greeting(user: &User) -> SignalMessage {
    SignalMessage::Success {
        message: format!("Successful connection for user: {}", user.first_name),
    }
}

/// Run a session to completion on an upgraded socket.
///
/// Resources are released on every exit path regardless of which loop failed
/// first; once this returns, the subscription is gone and `is_present`
/// observes the user as offline (barring other live sessions).
pub async fn run(mut socket: WebSocket, user: User, state: Arc<AppState>) {
    let subscription = match state.bus.subscribe(&user.id).await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(
                target: "hub.signaling.session",
                error = %e,
                user_id = %user.id,
                "Closing socket: could not subscribe to user channel"
            );
            if let Ok(payload) = serde_json::to_string(&SignalMessage::Error {
                error: "Failed to join the signaling fabric".to_string(),
            }) {
                let _ = socket.send(Message::Text(payload.into())).await;
            }
            return;
        }
    };

    info!(target: "hub.signaling.session", user_id = %user.id, "Session connected");

    let (sink, stream) = socket.split();
    let (outbound, outbound_rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_DEPTH);
    let cancel = CancellationToken::new();

    // Single writer; both loops only ever enqueue.
    let writer = tokio::spawn(write_loop(sink, outbound_rx, cancel.clone()));

    // The greeting goes through the queue so ordering holds from frame one.
    if !enqueue(&outbound, &greeting(&user)).await {
        cancel.cancel();
    }

    announce_presence(&state, &user).await;

    tokio::join!(
        read_loop(stream, &state, &user, &outbound, cancel.clone()),
        bus_loop(subscription, &user, &outbound, cancel.clone()),
    );

    // The loops held the only senders; dropping ours lets the writer drain
    // the queue and close the socket.
    drop(outbound);
    let _ = writer.await;

    info!(target: "hub.signaling.session", user_id = %user.id, "Session closed");
}

/// Tell each teammate with a live session that this user just came online.
async fn announce_presence(state: &Arc<AppState>, user: &User) {
    let teammates = match UsersRepository::teammates_of(&state.pool, user).await {
        Ok(teammates) => teammates,
        Err(e) => {
            warn!(
                target: "hub.signaling.session",
                error = %e,
                user_id = %user.id,
                "Could not load teammates for presence announcement"
            );
            return;
        }
    };

    for teammate in teammates {
        match state.bus.is_present(&teammate.id).await {
            Ok(true) => {
                debug!(
                    target: "hub.signaling.session",
                    user_id = %user.id,
                    teammate_id = %teammate.id,
                    "Notifying teammate of presence"
                );
                router::forward_to(
                    state,
                    &teammate.id,
                    &SignalMessage::TeammateOnline {
                        teammate_id: user.id.clone(),
                    },
                )
                .await;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(
                    target: "hub.signaling.session",
                    error = %e,
                    teammate_id = %teammate.id,
                    "Presence lookup failed during announcement"
                );
            }
        }
    }
}

async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<String>,
    cancel: CancellationToken,
) {
    while let Some(payload) = outbound_rx.recv().await {
        if sink.send(Message::Text(payload.into())).await.is_err() {
            break;
        }
    }
    cancel.cancel();
    let _ = sink.close().await;
}

async fn read_loop(
    mut stream: SplitStream<WebSocket>,
    state: &Arc<AppState>,
    user: &User,
    outbound: &OutboundSender,
    cancel: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            () = cancel.cancelled() => break,
            frame = stream.next() => frame,
        };

        let Some(frame) = frame else {
            debug!(target: "hub.signaling.session", user_id = %user.id, "WebSocket stream ended");
            break;
        };

        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                debug!(
                    target: "hub.signaling.session",
                    user_id = %user.id,
                    error = %e,
                    "WebSocket read error"
                );
                break;
            }
        };

        match message {
            Message::Text(text) => {
                dispatch_client_frame(state, user, text.as_str(), outbound).await;
            }
            Message::Binary(_) => {
                warn!(
                    target: "hub.signaling.session",
                    user_id = %user.id,
                    "Ignoring binary frame"
                );
            }
            Message::Close(_) => {
                debug!(
                    target: "hub.signaling.session",
                    user_id = %user.id,
                    "WebSocket closed by peer"
                );
                break;
            }
            // Protocol-level ping/pong is answered by the transport layer.
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
    cancel.cancel();
}

async fn bus_loop(
    mut subscription: UserSubscription,
    user: &User,
    outbound: &OutboundSender,
    cancel: CancellationToken,
) {
    loop {
        let payload = tokio::select! {
            () = cancel.cancelled() => break,
            payload = subscription.next_payload() => payload,
        };

        let Some(payload) = payload else {
            warn!(
                target: "hub.signaling.session",
                user_id = %user.id,
                "Bus subscription closed"
            );
            break;
        };

        forward_bus_frame(&payload, user, outbound).await;
    }
    cancel.cancel();
}

/// Forward one published frame to the socket, filtered to the routable set.
/// Forwarded frames pass through as the published bytes.
async fn forward_bus_frame(payload: &str, user: &User, outbound: &OutboundSender) {
    match messages::decode(payload) {
        Ok(Decoded::Message(message)) if message.is_bus_forwardable() => {
            let _ = outbound.send(payload.to_string()).await;
        }
        Ok(Decoded::Message(message)) => {
            debug!(
                target: "hub.signaling.session",
                user_id = %user.id,
                tag = message.tag(),
                "Ignoring bus message type"
            );
        }
        Ok(Decoded::Unknown(tag)) => {
            warn!(
                target: "hub.signaling.session",
                user_id = %user.id,
                tag = %tag,
                "Unknown bus message type"
            );
        }
        Err(e) => {
            warn!(
                target: "hub.signaling.session",
                user_id = %user.id,
                error = %e,
                "Undecodable bus payload"
            );
        }
    }
}

/// Dispatch one decoded client frame by tag.
async fn dispatch_client_frame(
    state: &Arc<AppState>,
    user: &User,
    text: &str,
    outbound: &OutboundSender,
) {
    let decoded = match messages::decode(text) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!(
                target: "hub.signaling.session",
                user_id = %user.id,
                error = %e,
                "Undecodable client frame"
            );
            enqueue(
                outbound,
                &SignalMessage::Error {
                    error: e.to_string(),
                },
            )
            .await;
            return;
        }
    };

    let message = match decoded {
        Decoded::Message(message) => message,
        Decoded::Unknown(tag) => {
            warn!(
                target: "hub.signaling.session",
                user_id = %user.id,
                tag = %tag,
                "Unknown message type"
            );
            return;
        }
    };

    match message {
        SignalMessage::CallRequest { callee_id } => {
            info!(target: "hub.signaling.session", user_id = %user.id, "Received call request");
            router::initiate_call(state, user, &callee_id, outbound).await;
        }
        SignalMessage::CallAccept { caller_id } => {
            info!(target: "hub.signaling.session", user_id = %user.id, "Accepting call");
            call::accept(state, &user.id, &caller_id).await;
        }
        SignalMessage::CallReject { caller_id } => {
            info!(target: "hub.signaling.session", user_id = %user.id, "Rejecting call");
            let target = caller_id.clone();
            router::forward_to(state, &target, &SignalMessage::CallReject { caller_id }).await;
        }
        SignalMessage::CallEnd { participant_id } => {
            info!(target: "hub.signaling.session", user_id = %user.id, "Ending call");
            let target = participant_id.clone();
            router::forward_to(state, &target, &SignalMessage::CallEnd { participant_id }).await;
        }
        SignalMessage::TeammateOnline { teammate_id } => {
            router::forward_to(
                state,
                &teammate_id,
                &SignalMessage::TeammateOnline {
                    teammate_id: user.id.clone(),
                },
            )
            .await;
        }
        SignalMessage::Ping { .. } => {
            debug!(target: "hub.signaling.session", user_id = %user.id, "Received ping");
            enqueue(outbound, &SignalMessage::pong()).await;
        }
        other => {
            warn!(
                target: "hub.signaling.session",
                user_id = %user.id,
                tag = other.tag(),
                "Ignoring unexpected client frame"
            );
        }
    }
}
