//! Domain entities - core business objects

mod message;
mod presence;

pub use message::{Message, MessageKind};
pub use presence::{PresenceCapability, PresenceOutcome, PresenceRecord};
