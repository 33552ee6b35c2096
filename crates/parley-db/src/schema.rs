//! Schema bootstrap and presence capability detection
//!
//! The message table is owned by this service and created on startup.
//! The account table belongs to an external account store; it is only
//! inspected, never created or altered.

use parley_core::{DomainError, PresenceCapability};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

const MESSAGE_SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS messages (
        id            BIGINT PRIMARY KEY,
        sender        TEXT NOT NULL,
        recipient     TEXT NOT NULL,
        content       TEXT NOT NULL,
        message_type  TEXT NOT NULL DEFAULT 'text',
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        is_read       BOOLEAN NOT NULL DEFAULT FALSE,
        read_at       TIMESTAMPTZ,
        sender_online BOOLEAN NOT NULL DEFAULT FALSE
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages (sender, recipient, id DESC)",
    "CREATE INDEX IF NOT EXISTS idx_messages_recipient ON messages (recipient, id DESC)",
];

const MAX_IDENTIFIER_LEN: usize = 63;

/// Create the message table and its indexes if missing
#[instrument(skip(pool))]
pub async fn ensure_message_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in MESSAGE_SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Message schema ready");
    Ok(())
}

/// Check whether `table` carries the `is_online` and `last_seen` columns.
///
/// The name is resolved the way PostgreSQL resolves it in a query: unquoted
/// identifiers fold to lower case and unqualified names follow `search_path`.
/// A table that does not resolve yields no columns.
#[instrument(skip(pool))]
pub async fn detect_presence_capability(
    pool: &PgPool,
    table: &str,
) -> Result<PresenceCapability, sqlx::Error> {
    let columns: Vec<(String,)> = sqlx::query_as(
        r"
        SELECT a.attname::text
        FROM pg_attribute a
        WHERE a.attrelid = to_regclass($1::text)
          AND a.attnum > 0
          AND NOT a.attisdropped
          AND a.attname IN ('is_online', 'last_seen')
        ",
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    let has = |column: &str| columns.iter().any(|(c,)| c == column);
    let capability = PresenceCapability::from_columns(has("is_online"), has("last_seen"));

    if capability.is_full() {
        info!(table, "Presence columns found");
    } else {
        warn!(
            table,
            "Presence columns missing; connect/disconnect will only be logged"
        );
    }
    Ok(capability)
}

/// Validate a (possibly schema-qualified) table name before it is spliced
/// into SQL text.
pub fn validate_identifier(name: &str) -> Result<(), DomainError> {
    let mut parts = 0;
    for part in name.split('.') {
        parts += 1;
        let mut chars = part.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_start || !valid_rest || part.len() > MAX_IDENTIFIER_LEN {
            return Err(DomainError::Validation(format!(
                "invalid table name '{name}'"
            )));
        }
    }
    if parts > 2 {
        return Err(DomainError::Validation(format!(
            "invalid table name '{name}'"
        )));
    }
    Ok(())
}
