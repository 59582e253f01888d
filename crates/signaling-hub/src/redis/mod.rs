//! Redis pub/sub fabric: message bus, presence registry, per-session
//! subscriptions.

mod client;

pub use client::{user_channel, SignalBus, UserSubscription};
