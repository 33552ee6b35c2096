//! Error handling utilities for repositories

use parley_core::DomainError;
use sqlx::Error as SqlxError;
use tracing::error;

/// Convert SQLx error to DomainError
///
/// Pool timeouts and connection failures land here too, so callers see a
/// bounded-time failure as an ordinary storage error.
pub fn map_db_error(e: SqlxError) -> DomainError {
    let kind = match &e {
        SqlxError::PoolTimedOut => "pool timed out",
        SqlxError::PoolClosed => "pool closed",
        SqlxError::Io(_) | SqlxError::Tls(_) => "connection failed",
        SqlxError::Database(_) => "query failed",
        _ => "database error",
    };
    error!(error = %e, kind, "Storage operation failed");
    DomainError::Storage(format!("{kind}: {e}"))
}
