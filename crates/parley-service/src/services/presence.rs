//! Presence service
//!
//! Tracks advisory online/offline state on existing account records.
//! Presence is best-effort: it never blocks messaging, and when the account
//! store lacks presence columns, connect/disconnect are only logged.

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use parley_core::PresenceOutcome;

use crate::dto::{OnlineUsersResponse, PresenceRequest, PresenceUpdateResponse, UserStatusResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mark the user online and stamp `last_seen`. Idempotent.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn connect(&self, request: PresenceRequest) -> ServiceResult<PresenceUpdateResponse> {
        self.set_status(request, true).await
    }

    /// Mark the user offline and stamp `last_seen`. Idempotent.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn disconnect(
        &self,
        request: PresenceRequest,
    ) -> ServiceResult<PresenceUpdateResponse> {
        self.set_status(request, false).await
    }

    async fn set_status(
        &self,
        request: PresenceRequest,
        online: bool,
    ) -> ServiceResult<PresenceUpdateResponse> {
        request.validate()?;
        let username = request.username;
        let repo = self.ctx.presence_repo();

        let outcome = if !repo.capability().is_full() {
            info!(online, "Presence not tracked by account store; event logged");
            PresenceOutcome::Logged
        } else if repo.set_online(&username, online, Utc::now()).await? {
            info!(online, "Presence updated");
            PresenceOutcome::Updated
        } else {
            warn!(online, "Presence change for unknown account ignored");
            PresenceOutcome::UnknownUser
        };

        Ok(PresenceUpdateResponse::new(username, online, outcome))
    }

    /// Pure read. Absent accounts and store failures both read as offline.
    #[instrument(skip(self))]
    pub async fn is_online(&self, username: &str) -> bool {
        match self.ctx.presence_repo().find(username).await {
            Ok(record) => record.is_some_and(|r| r.is_online),
            Err(e) => {
                warn!(error = %e, "Presence lookup failed; reporting offline");
                false
            }
        }
    }

    pub async fn status(&self, username: &str) -> UserStatusResponse {
        UserStatusResponse {
            username: username.to_string(),
            is_online: self.is_online(username).await,
        }
    }

    /// Snapshot of users recorded online, sorted by username
    #[instrument(skip(self))]
    pub async fn list_online_users(&self) -> ServiceResult<OnlineUsersResponse> {
        let users = self.ctx.presence_repo().list_online().await?;
        Ok(OnlineUsersResponse {
            count: users.len(),
            users,
        })
    }

    /// Mark online accounts not seen within `threshold_minutes` as offline.
    /// `None` uses the configured threshold. Returns the number changed.
    #[instrument(skip(self))]
    pub async fn sweep_inactive(&self, threshold_minutes: Option<u32>) -> ServiceResult<u64> {
        let repo = self.ctx.presence_repo();
        if !repo.capability().is_full() {
            return Ok(0);
        }

        let minutes = threshold_minutes.unwrap_or_else(|| self.ctx.inactive_minutes());
        let cutoff = Utc::now() - Duration::minutes(i64::from(minutes));
        let changed = repo.mark_stale_offline(cutoff).await?;

        if changed > 0 {
            info!(changed, minutes, "Inactive users marked offline");
        }
        Ok(changed)
    }
}
