//! # parley-service
//!
//! Application layer containing the message store and presence tracker
//! services, the background presence sweeper, and the request/response DTOs.

pub mod dto;
pub mod services;

pub use services::{
    MessageLimits, MessageService, PresenceService, PresenceSweeper, PresenceSweeperConfig,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
