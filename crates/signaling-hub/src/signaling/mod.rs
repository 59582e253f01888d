//! The signaling core: wire codec, per-connection session, message router,
//! and call coordinator.
//!
//! The wire protocol is a tagged variant; adding a message type touches the
//! codec ([`messages`]), the read-loop dispatch ([`session`]), and the
//! bus-loop filter ([`messages::SignalMessage::is_bus_forwardable`]) - keep
//! these in sync.

pub mod call;
pub mod messages;
pub mod router;
pub mod session;
