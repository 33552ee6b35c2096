//! # parley-core
//!
//! Domain layer containing the message and presence entities, the Snowflake
//! identifier, and the repository traits implemented by `parley-db`.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Message, MessageKind, PresenceCapability, PresenceOutcome, PresenceRecord,
};
pub use error::DomainError;
pub use traits::{MessageRepository, PresenceRepository, RepoResult};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
