//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use parley_core::{Message, MessageRepository, RepoResult};

use crate::models::MessageModel;

use super::error::map_db_error;

const MESSAGE_COLUMNS: &str =
    "id, sender, recipient, content, message_type, created_at, is_read, read_at, sender_online";

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO messages
                (id, sender, recipient, content, message_type, created_at, is_read, read_at, sender_online)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(message.id.into_inner())
        .bind(&message.sender)
        .bind(&message.recipient)
        .bind(&message.content)
        .bind(message.kind.as_str())
        .bind(message.created_at)
        .bind(message.read)
        .bind(message.read_at)
        .bind(message.sender_online)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_participant(&self, username: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE sender = $1 OR recipient = $1 \
             ORDER BY id DESC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, MessageModel>(&sql)
            .bind(username)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_conversation(&self, a: &str, b: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE (sender = $1 AND recipient = $2) OR (sender = $2 AND recipient = $1) \
             ORDER BY id DESC LIMIT $3"
        );
        let rows = sqlx::query_as::<_, MessageModel>(&sql)
            .bind(a)
            .bind(b)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        sender: &str,
        recipient: &str,
        read_at: DateTime<Utc>,
    ) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET is_read = TRUE, read_at = $3
            WHERE sender = $1 AND recipient = $2 AND is_read = FALSE
            ",
        )
        .bind(sender)
        .bind(recipient)
        .bind(read_at)
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
