//! Database connection pool management

mod postgres;

pub use postgres::{create_pool, DatabaseConfig, StorePools};
pub use sqlx::PgPool;
