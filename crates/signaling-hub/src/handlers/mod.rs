//! HTTP request handlers.

mod debug;
mod health;
mod livekit;
mod teammates;
mod user;
mod watercooler;
mod websocket;

pub use debug::{debug_call_token, debug_jwt};
pub use health::health_check;
pub use livekit::livekit_server_url;
pub use teammates::teammates;
pub use user::current_user;
pub use watercooler::{meet_redirect, watercooler, watercooler_anonymous};
pub use websocket::websocket;
