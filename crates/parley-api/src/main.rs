//! Parley API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p parley-api
//! ```
//!
//! Configuration is read from environment variables and an optional `.env`.

use parley_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not configured yet; fall back to the default subscriber
            if let Err(init_err) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {init_err}");
            }
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        backend = ?config.storage.backend,
        address = %config.api.address(),
        "Configuration loaded"
    );

    parley_api::run(config).await?;

    Ok(())
}
