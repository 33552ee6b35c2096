//! Test helpers for integration tests
//!
//! Spawns the real server on an ephemeral port and wraps a `reqwest`
//! client around it.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use parley_api::{create_app, create_app_state, serve};
use parley_common::{AppConfig, StorageBackend};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Accounts pre-created in the memory account store
pub const SEED_ACCOUNTS: &[&str] = &["alice", "bob", "carol"];

/// Test server instance that manages lifecycle
///
/// The server shuts down gracefully when this value is dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    shutdown: Option<oneshot::Sender<()>>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the memory backend with [`SEED_ACCOUNTS`]
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::in_memory(SEED_ACCOUNTS.iter().copied())).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            serve(listener, app, shutdown).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            shutdown: Some(shutdown_tx),
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with a raw JSON string
    pub async fn post_raw(&self, path: &str, body: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await?)
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.put(&url).json(body).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Postgres-backed configuration from the environment, `None` when
/// `DATABASE_URL` is unset
pub fn postgres_config() -> Option<AppConfig> {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return None;
    }

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Skipping test: {e}");
            return None;
        }
    };
    config.storage.backend = StorageBackend::Postgres;
    config.presence.sweep_interval_secs = 0;
    config.rate_limit = None;
    Some(config)
}

/// Response envelope `{success, data?, error?}`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Assert response status and return the envelope's `data`
pub async fn assert_data<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let envelope: Envelope<T> = assert_envelope(response, expected_status).await?;
    if !envelope.success {
        anyhow::bail!("Expected success, got error: {:?}", envelope.error);
    }
    envelope
        .data
        .ok_or_else(|| anyhow::anyhow!("Envelope has no data"))
}

/// Assert response status and return the error message from the envelope
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let envelope: Envelope<serde_json::Value> = assert_envelope(response, expected_status).await?;
    if envelope.success {
        anyhow::bail!("Expected failure, got success");
    }
    envelope
        .error
        .ok_or_else(|| anyhow::anyhow!("Envelope has no error message"))
}

async fn assert_envelope<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<Envelope<T>> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}
