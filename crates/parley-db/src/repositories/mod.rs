//! PostgreSQL repository implementations

mod error;
mod message;
mod presence;

pub use error::map_db_error;
pub use message::PgMessageRepository;
pub use presence::PgPresenceRepository;
