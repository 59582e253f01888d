//! Users repository.
//!
//! All queries use parameterized statements and never write; user records
//! are owned by the account surface.

use crate::errors::HubError;
use crate::models::User;
use sqlx::PgPool;
use tracing::instrument;

const USER_COLUMNS: &str = "id, first_name, last_name, email, avatar_url, is_admin, team_id, \
                            created_at, updated_at";

/// Repository for user lookups.
pub struct UsersRepository;

impl UsersRepository {
    /// Resolve a user from the email claim of a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Database` on query failure.
    #[instrument(skip_all)]
    pub async fn by_email(pool: &PgPool, email: &str) -> Result<Option<User>, HubError> {
        let user: Option<User> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Load a user by id.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Database` on query failure.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn by_id(pool: &PgPool, id: &str) -> Result<Option<User>, HubError> {
        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    /// All other members of the user's team.
    ///
    /// Returns an empty list for users without a team.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Database` on query failure.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn teammates_of(pool: &PgPool, user: &User) -> Result<Vec<User>, HubError> {
        let Some(team_id) = user.team_id else {
            return Ok(Vec::new());
        };

        let teammates: Vec<User> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE team_id = $1 AND id != $2 ORDER BY id"
        ))
        .bind(team_id)
        .bind(&user.id)
        .fetch_all(pool)
        .await?;

        Ok(teammates)
    }
}
