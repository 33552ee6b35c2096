use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parley_core::{PresenceCapability, PresenceRecord, PresenceRepository, RepoResult};

use super::unavailable;

/// Account store kept in process memory
///
/// Accounts are never created through the repository trait; seed them with
/// [`InMemoryPresenceRepository::with_usernames`] or [`InMemoryPresenceRepository::insert`].
#[derive(Debug, Default)]
pub struct InMemoryPresenceRepository {
    records: DashMap<String, PresenceRecord>,
    capability: PresenceCapability,
    unavailable: AtomicBool,
}

impl InMemoryPresenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with offline accounts
    pub fn with_usernames<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let repo = Self::default();
        for name in usernames {
            repo.insert(PresenceRecord::offline(name));
        }
        repo
    }

    pub fn with_capability(mut self, capability: PresenceCapability) -> Self {
        self.capability = capability;
        self
    }

    /// Insert or replace an account record
    pub fn insert(&self, record: PresenceRecord) {
        self.records.insert(record.username.clone(), record);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable("account"));
        }
        Ok(())
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    fn capability(&self) -> PresenceCapability {
        self.capability
    }

    async fn set_online(
        &self,
        username: &str,
        online: bool,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        self.check()?;
        if !self.capability.is_full() {
            return Ok(false);
        }
        Ok(match self.records.get_mut(username) {
            Some(mut record) => {
                record.is_online = online;
                record.last_seen = Some(at);
                true
            }
            None => false,
        })
    }

    async fn find(&self, username: &str) -> RepoResult<Option<PresenceRecord>> {
        self.check()?;
        Ok(self.records.get(username).map(|r| {
            if self.capability.is_full() {
                r.clone()
            } else {
                PresenceRecord::offline(r.username.clone())
            }
        }))
    }

    async fn list_online(&self) -> RepoResult<Vec<String>> {
        self.check()?;
        if !self.capability.is_full() {
            return Ok(Vec::new());
        }
        let mut online: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.is_online)
            .map(|r| r.username.clone())
            .collect();
        online.sort_unstable();
        Ok(online)
    }

    async fn mark_stale_offline(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        self.check()?;
        if !self.capability.is_full() {
            return Ok(0);
        }
        let mut changed = 0;
        for mut record in self.records.iter_mut() {
            if record.is_stale(cutoff) {
                record.is_online = false;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn ping(&self) -> RepoResult<()> {
        self.check()
    }
}
