//! End-to-end signaling scenarios over real WebSockets.
//!
//! These tests spawn a full hub and therefore need live backing services;
//! they are ignored unless `DATABASE_URL` and `REDIS_URL` point at
//! disposable instances:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/hub_test REDIS_URL=redis://localhost \
//!     cargo test -p signaling-hub -- --ignored
//! ```

mod support;

use anyhow::Result;
use support::{unique, unique_email, TestHub};

/// A call request for a user with no live session short-circuits to
/// `callee_offline` on the caller's own socket; nothing rings.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn offline_callee_short_circuits() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let a_email = unique_email("caller");
    hub.seed_user("Alice", &a_email, Some(team)).await?;
    let b_id = hub.seed_user("Bob", &unique_email("callee"), Some(team)).await?;

    let mut a = hub.connect_ws(&a_email).await?;
    a.wait_for("success").await?;

    a.send_text(&format!(
        r#"{{"type":"call_request","payload":{{"callee_id":"{b_id}"}}}}"#
    ))
    .await?;

    let offline = a.wait_for("callee_offline").await?;
    assert_eq!(offline["payload"]["callee_id"], b_id.as_str());

    Ok(())
}

/// The happy path: request, ring, accept, tokens to both sides with
/// crossed participant ids, then a peer-driven end.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn happy_path_call() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let a_email = unique_email("alice");
    let b_email = unique_email("bob");
    let a_id = hub.seed_user("Alice", &a_email, Some(team)).await?;
    let b_id = hub.seed_user("Bob", &b_email, Some(team)).await?;

    let mut a = hub.connect_ws(&a_email).await?;
    a.wait_for("success").await?;
    let mut b = hub.connect_ws(&b_email).await?;
    b.wait_for("success").await?;
    hub.await_presence(&b_id, true).await?;

    a.send_text(&format!(
        r#"{{"type":"call_request","payload":{{"callee_id":"{b_id}"}}}}"#
    ))
    .await?;

    let ring = b.wait_for("incoming_call").await?;
    assert_eq!(ring["payload"]["caller_id"], a_id.as_str());

    b.send_text(&format!(
        r#"{{"type":"call_accept","payload":{{"caller_id":"{a_id}"}}}}"#
    ))
    .await?;

    let acceptance = a.wait_for("call_accept").await?;
    assert_eq!(acceptance["payload"]["caller_id"], a_id.as_str());

    let a_tokens = a.wait_for("call_tokens").await?;
    assert_eq!(a_tokens["payload"]["participant"], b_id.as_str());
    assert!(a_tokens["payload"]["audioToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(a_tokens["payload"]["videoToken"].as_str().is_some_and(|t| !t.is_empty()));

    let b_tokens = b.wait_for("call_tokens").await?;
    assert_eq!(b_tokens["payload"]["participant"], a_id.as_str());

    a.send_text(&format!(
        r#"{{"type":"call_end","payload":{{"participant_id":"{b_id}"}}}}"#
    ))
    .await?;

    let end = b.wait_for("call_end").await?;
    assert_eq!(end["payload"]["participant_id"], b_id.as_str());

    Ok(())
}

/// A rejected ring reaches the caller and no tokens are minted.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn rejected_call_notifies_caller_without_tokens() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let a_email = unique_email("alice");
    let b_email = unique_email("bob");
    let a_id = hub.seed_user("Alice", &a_email, Some(team)).await?;
    let b_id = hub.seed_user("Bob", &b_email, Some(team)).await?;

    let mut a = hub.connect_ws(&a_email).await?;
    a.wait_for("success").await?;
    let mut b = hub.connect_ws(&b_email).await?;
    b.wait_for("success").await?;
    hub.await_presence(&b_id, true).await?;

    a.send_text(&format!(
        r#"{{"type":"call_request","payload":{{"callee_id":"{b_id}"}}}}"#
    ))
    .await?;
    b.wait_for("incoming_call").await?;

    b.send_text(&format!(
        r#"{{"type":"call_reject","payload":{{"caller_id":"{a_id}"}}}}"#
    ))
    .await?;

    let rejection = a.wait_for("call_reject").await?;
    assert_eq!(rejection["payload"]["caller_id"], a_id.as_str());

    // No tokens follow a rejection; the next frame A could see would be
    // presence chatter at most.
    a.send_text(r#"{"type":"ping","payload":{"message":"ping"}}"#)
        .await?;
    let next = a.wait_for("pong").await?;
    assert_eq!(next["payload"]["message"], "pong");

    Ok(())
}

/// Both of a user's parallel sessions ring; the accept fan-out reaches
/// them both through the shared channel.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn duplicate_sessions_both_ring() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let a_email = unique_email("alice");
    let b_email = unique_email("bob");
    let a_id = hub.seed_user("Alice", &a_email, Some(team)).await?;
    let b_id = hub.seed_user("Bob", &b_email, Some(team)).await?;

    let mut a = hub.connect_ws(&a_email).await?;
    a.wait_for("success").await?;
    let mut b_first = hub.connect_ws(&b_email).await?;
    b_first.wait_for("success").await?;
    let mut b_second = hub.connect_ws(&b_email).await?;
    b_second.wait_for("success").await?;
    hub.await_presence(&b_id, true).await?;

    a.send_text(&format!(
        r#"{{"type":"call_request","payload":{{"callee_id":"{b_id}"}}}}"#
    ))
    .await?;

    let ring_first = b_first.wait_for("incoming_call").await?;
    let ring_second = b_second.wait_for("incoming_call").await?;
    assert_eq!(ring_first["payload"]["caller_id"], a_id.as_str());
    assert_eq!(ring_second["payload"]["caller_id"], a_id.as_str());

    b_first
        .send_text(&format!(
            r#"{{"type":"call_accept","payload":{{"caller_id":"{a_id}"}}}}"#
        ))
        .await?;

    // The acceptor's peer gets tokens; the second session observes the same
    // channel traffic (documented behavior).
    let a_tokens = a.wait_for("call_tokens").await?;
    assert_eq!(a_tokens["payload"]["participant"], b_id.as_str());
    let second_tokens = b_second.wait_for("call_tokens").await?;
    assert_eq!(second_tokens["payload"]["participant"], a_id.as_str());

    Ok(())
}

/// Ping is answered with pong on the same socket, no bus involved.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn ping_pong() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let email = unique_email("pinger");
    hub.seed_user("Pia", &email, Some(team)).await?;

    let mut client = hub.connect_ws(&email).await?;
    client.wait_for("success").await?;

    client
        .send_text(r#"{"type":"ping","payload":{"message":"ping"}}"#)
        .await?;

    let pong = client.wait_for("pong").await?;
    assert_eq!(pong["payload"]["message"], "pong");

    Ok(())
}

/// Unknown message types are skipped without dropping the session.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn unknown_message_type_keeps_session_alive() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let email = unique_email("curious");
    hub.seed_user("Cleo", &email, Some(team)).await?;

    let mut client = hub.connect_ws(&email).await?;
    client.wait_for("success").await?;

    client
        .send_text(r#"{"type":"screen_share","payload":{"on":true}}"#)
        .await?;

    // The session is still alive and responsive.
    client
        .send_text(r#"{"type":"ping","payload":{"message":"ping"}}"#)
        .await?;
    client.wait_for("pong").await?;

    Ok(())
}

/// Malformed payloads get an `error` frame; the session continues.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn malformed_payload_yields_error_frame() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let email = unique_email("fuzzer");
    hub.seed_user("Mal", &email, Some(team)).await?;

    let mut client = hub.connect_ws(&email).await?;
    client.wait_for("success").await?;

    client
        .send_text(r#"{"type":"call_request","payload":{"no_callee":true}}"#)
        .await?;
    client.wait_for("error").await?;

    client
        .send_text(r#"{"type":"ping","payload":{"message":"ping"}}"#)
        .await?;
    client.wait_for("pong").await?;

    Ok(())
}

/// Presence turns on with the subscription and off
/// within a bounded interval of the socket closing.
#[tokio::test]
#[ignore = "requires DATABASE_URL and REDIS_URL pointing at disposable services"]
async fn presence_follows_session_lifetime() -> Result<()> {
    let hub = TestHub::spawn().await?;
    let team = hub.seed_team(&unique("team")).await?;
    let email = unique_email("ghost");
    let id = hub.seed_user("Gus", &email, Some(team)).await?;

    assert!(!hub.bus.is_present(&id).await?);

    let mut client = hub.connect_ws(&email).await?;
    client.wait_for("success").await?;
    hub.await_presence(&id, true).await?;

    client.close().await?;
    hub.await_presence(&id, false).await?;

    Ok(())
}
