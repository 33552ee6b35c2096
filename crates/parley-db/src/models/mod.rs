//! Database row models

mod message;
mod presence;

pub use message::MessageModel;
pub use presence::PresenceModel;
