use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use parley_core::{DomainError, Message, MessageRepository, RepoResult};

use super::unavailable;

/// Message store kept in process memory, ordered by insertion
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
    unavailable: AtomicBool,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    fn check(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable("message"));
        }
        Ok(())
    }

    fn newest_matching<F>(&self, limit: i64, filter: F) -> Vec<Message>
    where
        F: Fn(&Message) -> bool,
    {
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut found: Vec<Message> = self
            .messages
            .read()
            .iter()
            .filter(|m| filter(m))
            .cloned()
            .collect();
        found.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        found.truncate(limit);
        found
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.check()?;
        let mut messages = self.messages.write();
        if messages.iter().any(|m| m.id == message.id) {
            return Err(DomainError::Storage(format!(
                "duplicate message id {}",
                message.id
            )));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn find_by_participant(&self, username: &str, limit: i64) -> RepoResult<Vec<Message>> {
        self.check()?;
        Ok(self.newest_matching(limit, |m| m.involves(username)))
    }

    async fn find_conversation(&self, a: &str, b: &str, limit: i64) -> RepoResult<Vec<Message>> {
        self.check()?;
        Ok(self.newest_matching(limit, |m| m.is_between(a, b)))
    }

    async fn mark_read(
        &self,
        sender: &str,
        recipient: &str,
        read_at: DateTime<Utc>,
    ) -> RepoResult<u64> {
        self.check()?;
        let mut changed = 0;
        for message in self
            .messages
            .write()
            .iter_mut()
            .filter(|m| m.sender == sender && m.recipient == recipient)
        {
            if message.mark_read(read_at) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn ping(&self) -> RepoResult<()> {
        self.check()
    }
}
