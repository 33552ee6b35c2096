//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration, and the database pools to release on shutdown.

use std::sync::Arc;

use parley_common::AppConfig;
use parley_db::StorePools;
use parley_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    /// `None` on the memory backend
    pools: Option<StorePools>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pools: None,
        }
    }

    pub fn with_pools(mut self, pools: StorePools) -> Self {
        self.pools = Some(pools);
        self
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Shared handle for background tasks such as the presence sweeper
    pub fn shared_context(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.service_context)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pools(&self) -> Option<&StorePools> {
        self.pools.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("pools", &self.pools.is_some())
            .finish()
    }
}
