//! Entity <-> Model mappers
//!
//! Conversions between database models and domain entities.

mod message;
mod presence;
