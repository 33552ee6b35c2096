//! Presence columns of an account row

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PresenceModel {
    pub username: String,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}
