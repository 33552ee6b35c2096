//! Server setup and initialization
//!
//! Wires the stores for the configured backend, builds the application,
//! and runs it until a shutdown signal arrives.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use parley_common::{AppConfig, AppError, StorageBackend};
use parley_core::{MessageRepository, PresenceRepository};
use parley_db::{
    schema, InMemoryMessageRepository, InMemoryPresenceRepository, PgMessageRepository,
    PgPresenceRepository, StorePools,
};
use parley_service::{PresenceSweeper, PresenceSweeperConfig, ServiceContext};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Repository handles for one backend, plus the pools that back them
struct Stores {
    messages: Arc<dyn MessageRepository>,
    presence: Arc<dyn PresenceRepository>,
    pools: Option<StorePools>,
}

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = apply_middleware(create_router(), state.config());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let stores = match config.storage.backend {
        StorageBackend::Memory => memory_stores(&config),
        StorageBackend::Postgres => postgres_stores(&config).await?,
    };

    let service_context = ServiceContext::builder()
        .config(&config)
        .message_repo(stores.messages)
        .presence_repo(stores.presence)
        .build()?;

    let state = AppState::new(service_context, config);
    Ok(match stores.pools {
        Some(pools) => state.with_pools(pools),
        None => state,
    })
}

fn memory_stores(config: &AppConfig) -> Stores {
    warn!(
        accounts = config.storage.seed_accounts.len(),
        "Using in-memory stores; data is lost on restart"
    );
    Stores {
        messages: Arc::new(InMemoryMessageRepository::new()),
        presence: Arc::new(InMemoryPresenceRepository::with_usernames(
            config.storage.seed_accounts.iter().cloned(),
        )),
        pools: None,
    }
}

async fn postgres_stores(config: &AppConfig) -> Result<Stores, AppError> {
    let storage = &config.storage;

    // Reject a bad table name before touching the database
    schema::validate_identifier(&storage.account_table)?;

    info!("Connecting to PostgreSQL...");
    let pools = StorePools::connect(storage)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    schema::ensure_message_schema(&pools.messages)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let capability = schema::detect_presence_capability(&pools.accounts, &storage.account_table)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let presence = PgPresenceRepository::new(
        pools.accounts.clone(),
        &storage.account_table,
        capability,
    )?;

    Ok(Stores {
        messages: Arc::new(PgMessageRepository::new(pools.messages.clone())),
        presence: Arc::new(presence),
        pools: Some(pools),
    })
}

/// Run the HTTP server on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(AppError::internal)?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::internal)
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let sweeper_config = PresenceSweeperConfig::from_presence(&config.presence);

    let state = create_app_state(config).await?;

    let sweeper = match sweeper_config {
        Some(sweeper_config) => {
            let sweeper = Arc::new(PresenceSweeper::new(state.shared_context(), sweeper_config));
            Arc::clone(&sweeper).start();
            Some(sweeper)
        }
        None => {
            info!("Presence sweeper disabled");
            None
        }
    };

    let pools = state.pools().cloned();
    let app = create_app(state);

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to bind to {addr}: {e}")))?;

    let result = serve(listener, app, shutdown_signal()).await;

    if let Some(sweeper) = sweeper {
        sweeper.stop().await;
    }
    if let Some(pools) = pools {
        pools.close().await;
    }
    info!("Server stopped");

    result
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
