//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate with hub-specific
//! guidance. Use these types for all sensitive values: the session signing
//! secret, the SFU API secret, and connection URLs that embed credentials.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so any
//! struct that derives `Debug` while holding a secret gets safe logging for
//! free; the value only leaves the wrapper through an explicit
//! `expose_secret()` call. Secrets are zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct SfuCredentials {
//!     api_key: String,
//!     api_secret: SecretString,  // Safe: Debug shows "[REDACTED]"
//! }
//!
//! let creds = SfuCredentials {
//!     api_key: "APIxyz".to_string(),
//!     api_secret: SecretString::from("shhh"),
//! };
//!
//! // This is safe - the secret is redacted
//! println!("{:?}", creds);
//!
//! // To sign with the value, expose it explicitly
//! let secret: &str = creds.api_secret.expose_secret();
//! ```
//!
//! # Hub usage guidelines
//!
//! Use `SecretString` for:
//! - `SESSION_SECRET` (bearer and anonymous-token signing)
//! - `LIVEKIT_API_SECRET` (media grant signing)
//! - `DATABASE_URL` and `REDIS_URL` (may carry `user:password@` userinfo)

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};
