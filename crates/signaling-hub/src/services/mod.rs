//! Service-layer components.

pub mod tokens;
