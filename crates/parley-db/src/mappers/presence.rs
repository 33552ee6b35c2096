//! Presence record <-> model mapper

use parley_core::PresenceRecord;

use crate::models::PresenceModel;

impl From<PresenceModel> for PresenceRecord {
    fn from(model: PresenceModel) -> Self {
        PresenceRecord {
            username: model.username,
            is_online: model.is_online,
            last_seen: model.last_seen,
        }
    }
}
