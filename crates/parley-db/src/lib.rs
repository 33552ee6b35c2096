//! # parley-db
//!
//! Persistence layer implementing the `parley-core` repository traits.
//!
//! ## Overview
//!
//! - PostgreSQL connection pools for the message store and the account store
//! - Schema bootstrap and presence capability detection
//! - Row models with SQLx `FromRow` derives, and entity mappers
//! - `Pg*Repository` implementations
//! - `InMemory*Repository` implementations for development and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_db::{schema, PgMessageRepository, StorePools};
//!
//! async fn example(storage: &parley_common::StorageConfig) -> Result<(), sqlx::Error> {
//!     let pools = StorePools::connect(storage).await?;
//!     schema::ensure_message_schema(&pools.messages).await?;
//!     let messages = PgMessageRepository::new(pools.messages.clone());
//!     // Use the repository...
//!     pools.close().await;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use memory::{InMemoryMessageRepository, InMemoryPresenceRepository};
pub use pool::{create_pool, DatabaseConfig, PgPool, StorePools};
pub use repositories::{PgMessageRepository, PgPresenceRepository};
