//! Presence entities - advisory online/offline state per account

use chrono::{DateTime, Utc};

/// A user's recorded presence, as stored on the account record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub username: String,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

impl PresenceRecord {
    pub fn offline(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_online: false,
            last_seen: None,
        }
    }

    /// Online but not seen since `cutoff`. A missing `last_seen` counts as stale.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.is_online && self.last_seen.map_or(true, |seen| seen < cutoff)
    }
}

/// Result of a connect or disconnect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceOutcome {
    /// The account record was updated
    Updated,
    /// No account with that username; nothing was created
    UnknownUser,
    /// The account store has no presence columns; the event was only logged
    Logged,
}

impl PresenceOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::UnknownUser => "unknown_user",
            Self::Logged => "logged",
        }
    }
}

/// Whether the account store can hold presence state, detected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceCapability {
    #[default]
    Full,
    /// Presence columns are missing; writes become logged no-ops
    Degraded,
}

impl PresenceCapability {
    pub fn from_columns(has_online: bool, has_last_seen: bool) -> Self {
        if has_online && has_last_seen {
            Self::Full
        } else {
            Self::Degraded
        }
    }

    #[inline]
    pub fn is_full(self) -> bool {
        self == Self::Full
    }
}
