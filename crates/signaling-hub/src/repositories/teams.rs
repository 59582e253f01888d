//! Teams repository.

use crate::errors::HubError;
use crate::models::Team;
use sqlx::PgPool;
use tracing::instrument;

/// Repository for team lookups.
pub struct TeamsRepository;

impl TeamsRepository {
    /// Load a team by id.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Database` on query failure.
    #[instrument(skip_all, fields(team_id = id))]
    pub async fn by_id(pool: &PgPool, id: i64) -> Result<Option<Team>, HubError> {
        let team: Option<Team> = sqlx::query_as("SELECT id, name FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(team)
    }
}
