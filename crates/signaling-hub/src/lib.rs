//! Signaling Hub service library.
//!
//! The hub brokers one-to-one calls between authenticated users. It is a
//! stateful WebSocket gateway over a Redis pub/sub fabric:
//!
//! - every connected user holds a subscription to their own channel
//!   (`channel-user-<id>`), whose existence doubles as the presence signal;
//! - call setup, teardown, and presence messages are routed by publishing
//!   onto the recipient's channel, so delivery is uniform across processes;
//! - accepting a call mints short-lived SFU media grants for both parties.
//!
//! # Architecture
//!
//! HTTP handlers follow the Handler -> Repository pattern:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> repositories/*.rs
//! ```
//!
//! The signaling core lives beside it:
//!
//! ```text
//! handlers/websocket.rs -> signaling/session.rs -> signaling/{router,call}.rs
//!                                               -> redis/client.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `auth` - Bearer token issue/verify
//! - `middleware` - Authentication middleware
//! - `models` - Data models
//! - `repositories` - Read-only user/team queries
//! - `redis` - Pub/sub bus client and presence registry
//! - `signaling` - Wire codec, per-connection session, router, call coordinator
//! - `services` - SFU media grant and anonymous token issuer
//! - `handlers` - HTTP request handlers
//! - `routes` - Axum router setup

#![warn(clippy::pedantic)]

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod redis;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod signaling;
