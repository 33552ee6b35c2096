//! In-memory repositories for development and tests
//!
//! Each call takes its lock once, so every operation is atomic in the same
//! way a single SQL statement is. Both stores can be switched into an
//! unavailable state to exercise storage failure paths.

mod message;
mod presence;

pub use message::InMemoryMessageRepository;
pub use presence::InMemoryPresenceRepository;

use parley_core::DomainError;

fn unavailable(store: &str) -> DomainError {
    DomainError::Storage(format!("{store} store unavailable"))
}
