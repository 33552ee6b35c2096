//! Service context - dependency container for services
//!
//! Holds the two store handles and the id generator. Store handles are
//! acquired at startup and injected here; services never reach for globals.

use std::sync::Arc;

use parley_common::AppConfig;
use parley_core::{MessageRepository, PresenceRepository, Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// History and conversation size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

impl MessageLimits {
    /// Absent or non-positive requests get the default; large ones are clamped
    pub fn resolve(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(n) if n > 0 => n.min(self.max_limit),
            _ => self.default_limit,
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    message_repo: Arc<dyn MessageRepository>,
    presence_repo: Arc<dyn PresenceRepository>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    limits: MessageLimits,
    inactive_minutes: u32,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn presence_repo(&self) -> &dyn PresenceRepository {
        self.presence_repo.as_ref()
    }

    pub fn limits(&self) -> MessageLimits {
        self.limits
    }

    /// Default sweep threshold in minutes
    pub fn inactive_minutes(&self) -> u32 {
        self.inactive_minutes
    }

    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("presence_capability", &self.presence_repo.capability())
            .field("limits", &self.limits)
            .field("inactive_minutes", &self.inactive_minutes)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    message_repo: Option<Arc<dyn MessageRepository>>,
    presence_repo: Option<Arc<dyn PresenceRepository>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    limits: MessageLimits,
    inactive_minutes: u32,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            message_repo: None,
            presence_repo: None,
            snowflake_generator: None,
            limits: MessageLimits::default(),
            inactive_minutes: 30,
        }
    }

    /// Take limits, sweep threshold and worker id from the app config
    pub fn config(mut self, config: &AppConfig) -> Self {
        self.limits = MessageLimits {
            default_limit: config.messages.default_limit,
            max_limit: config.messages.max_limit,
        };
        self.inactive_minutes = config.presence.inactive_minutes;
        self.snowflake_generator = Some(Arc::new(SnowflakeGenerator::new(
            config.snowflake.worker_id,
        )));
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn presence_repo(mut self, repo: Arc<dyn PresenceRepository>) -> Self {
        self.presence_repo = Some(repo);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn limits(mut self, limits: MessageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn inactive_minutes(mut self, minutes: u32) -> Self {
        self.inactive_minutes = minutes;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            message_repo: self
                .message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            presence_repo: self
                .presence_repo
                .ok_or_else(|| ServiceError::validation("presence_repo is required"))?,
            snowflake_generator: self.snowflake_generator.unwrap_or_default(),
            limits: self.limits,
            inactive_minutes: self.inactive_minutes,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
