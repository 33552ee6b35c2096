//! PostgreSQL implementation of PresenceRepository
//!
//! Presence lives on rows of an externally owned account table. The table
//! name is configurable, so queries are assembled once at construction time
//! from a validated identifier.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use parley_core::{
    DomainError, PresenceCapability, PresenceRecord, PresenceRepository, RepoResult,
};

use crate::models::PresenceModel;
use crate::schema::validate_identifier;

use super::error::map_db_error;

#[derive(Debug, Clone)]
struct PresenceQueries {
    set_online: String,
    find: String,
    exists: String,
    list_online: String,
    mark_stale: String,
}

impl PresenceQueries {
    fn for_table(table: &str) -> Self {
        Self {
            set_online: format!(
                "UPDATE {table} SET is_online = $2, last_seen = $3 WHERE username = $1"
            ),
            // last_seen may be TIMESTAMP or TIMESTAMPTZ in the account store
            find: format!(
                "SELECT username, COALESCE(is_online, FALSE) AS is_online, \
                 last_seen::timestamptz AS last_seen FROM {table} WHERE username = $1"
            ),
            exists: format!("SELECT username FROM {table} WHERE username = $1"),
            list_online: format!(
                "SELECT username FROM {table} WHERE is_online = TRUE ORDER BY username ASC"
            ),
            mark_stale: format!(
                "UPDATE {table} SET is_online = FALSE \
                 WHERE is_online = TRUE AND (last_seen IS NULL OR last_seen < $1)"
            ),
        }
    }
}

/// PostgreSQL implementation of PresenceRepository
#[derive(Debug, Clone)]
pub struct PgPresenceRepository {
    pool: PgPool,
    capability: PresenceCapability,
    queries: PresenceQueries,
}

impl PgPresenceRepository {
    /// `capability` comes from [`crate::schema::detect_presence_capability`].
    pub fn new(
        pool: PgPool,
        table: &str,
        capability: PresenceCapability,
    ) -> Result<Self, DomainError> {
        validate_identifier(table)?;
        Ok(Self {
            pool,
            capability,
            queries: PresenceQueries::for_table(table),
        })
    }
}

#[async_trait]
impl PresenceRepository for PgPresenceRepository {
    fn capability(&self) -> PresenceCapability {
        self.capability
    }

    #[instrument(skip(self))]
    async fn set_online(
        &self,
        username: &str,
        online: bool,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        if !self.capability.is_full() {
            return Ok(false);
        }
        let result = sqlx::query(&self.queries.set_online)
            .bind(username)
            .bind(online)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find(&self, username: &str) -> RepoResult<Option<PresenceRecord>> {
        if !self.capability.is_full() {
            // Without presence columns the account can only be reported offline
            let row: Option<(String,)> = sqlx::query_as(&self.queries.exists)
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;
            return Ok(row.map(|(name,)| PresenceRecord::offline(name)));
        }

        let row = sqlx::query_as::<_, PresenceModel>(&self.queries.find)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(PresenceRecord::from))
    }

    #[instrument(skip(self))]
    async fn list_online(&self) -> RepoResult<Vec<String>> {
        if !self.capability.is_full() {
            return Ok(Vec::new());
        }
        let rows: Vec<(String,)> = sqlx::query_as(&self.queries.list_online)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    #[instrument(skip(self))]
    async fn mark_stale_offline(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        if !self.capability.is_full() {
            return Ok(0);
        }
        let result = sqlx::query(&self.queries.mark_stale)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
