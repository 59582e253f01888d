//! Data models for the signaling hub.
//!
//! The hub never writes these records; they are owned by the account surface
//! and read here to resolve identities and team membership.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user.
///
/// `id` is a UUID v7 string minted at sign-up so the store's primary key
/// stays time-ordered. Immutable from the hub's perspective.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub team_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The user's display name: "first last", or just the first name when
    /// the last name is empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// A team; the hub reads it to scope watercooler rooms and anonymous invites.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
}
