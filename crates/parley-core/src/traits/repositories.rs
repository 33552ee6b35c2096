//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs from the message store and the
//! account store; `parley-db` provides PostgreSQL and in-memory
//! implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Message, PresenceCapability, PresenceRecord};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Messages sent or received by `username`, newest first
    async fn find_by_participant(&self, username: &str, limit: i64) -> RepoResult<Vec<Message>>;

    /// Messages exchanged between `a` and `b` in either direction, newest first
    async fn find_conversation(&self, a: &str, b: &str, limit: i64) -> RepoResult<Vec<Message>>;

    /// Mark unread messages from `sender` to `recipient` as read.
    /// Returns the number of messages changed.
    async fn mark_read(
        &self,
        sender: &str,
        recipient: &str,
        read_at: DateTime<Utc>,
    ) -> RepoResult<u64>;

    /// Check that the store is reachable
    async fn ping(&self) -> RepoResult<()>;
}

// ============================================================================
// Presence Repository
// ============================================================================

#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Capability detected when the repository was opened
    fn capability(&self) -> PresenceCapability;

    /// Set the online flag and stamp `last_seen`.
    /// Returns false when no account has that username.
    async fn set_online(&self, username: &str, online: bool, at: DateTime<Utc>)
        -> RepoResult<bool>;

    async fn find(&self, username: &str) -> RepoResult<Option<PresenceRecord>>;

    /// Usernames currently marked online, sorted ascending
    async fn list_online(&self) -> RepoResult<Vec<String>>;

    /// Mark every online account not seen since `cutoff` as offline.
    /// Returns the number of accounts changed.
    async fn mark_stale_offline(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;

    /// Check that the store is reachable
    async fn ping(&self) -> RepoResult<()>;
}
