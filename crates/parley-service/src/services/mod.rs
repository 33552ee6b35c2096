//! Business logic services
//!
//! Messages and presence are independent: neither service calls the other,
//! and there is no transaction spanning both stores.

pub mod context;
pub mod error;
pub mod message;
pub mod presence;
pub mod sweeper;

pub use context::{MessageLimits, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use message::MessageService;
pub use presence::PresenceService;
pub use sweeper::{PresenceSweeper, PresenceSweeperConfig};
