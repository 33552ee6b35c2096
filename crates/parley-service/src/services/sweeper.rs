//! Background presence sweeper
//!
//! Periodically runs [`PresenceService::sweep_inactive`] so accounts whose
//! clients vanished without disconnecting go offline. Runs until stopped.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use parley_common::PresenceConfig;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::presence::PresenceService;

/// Configuration for the presence sweeper
#[derive(Debug, Clone, Copy)]
pub struct PresenceSweeperConfig {
    /// Time between sweeps
    pub interval: Duration,
    /// Accounts online but unseen for this long are marked offline
    pub threshold_minutes: u32,
}

impl Default for PresenceSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            threshold_minutes: 30,
        }
    }
}

impl PresenceSweeperConfig {
    /// `None` when the interval is configured as 0 (sweeper disabled)
    pub fn from_presence(config: &PresenceConfig) -> Option<Self> {
        (config.sweep_interval_secs > 0).then(|| Self {
            interval: Duration::from_secs(config.sweep_interval_secs),
            threshold_minutes: config.inactive_minutes,
        })
    }
}

pub struct PresenceSweeper {
    ctx: Arc<ServiceContext>,
    config: PresenceSweeperConfig,
    running: AtomicBool,
    shutdown: Notify,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PresenceSweeper {
    pub fn new(ctx: Arc<ServiceContext>, config: PresenceSweeperConfig) -> Self {
        Self {
            ctx,
            config,
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
            handle: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the sweep loop. The first sweep happens one interval after start.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Presence sweeper is already running");
            return;
        }

        let sweeper = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            sweeper.run().await;
        });
        *self.handle.lock() = Some(handle);

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            threshold_minutes = self.config.threshold_minutes,
            "Presence sweeper started"
        );
    }

    /// Stop the loop and wait for an in-flight sweep to finish
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.shutdown.notify_one();

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Presence sweeper task failed");
            }
        }
        tracing::info!("Presence sweeper stopped");
    }

    /// Run a single sweep with the configured threshold
    pub async fn run_once(&self) -> ServiceResult<u64> {
        PresenceService::new(&self.ctx)
            .sweep_inactive(Some(self.config.threshold_minutes))
            .await
    }

    async fn run(&self) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; skip that tick
        ticker.tick().await;

        loop {
            tokio::select! {
                () = self.shutdown.notified() => break,
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(changed) => tracing::debug!(changed, "Presence sweep finished"),
                        Err(e) => tracing::error!(error = %e, "Presence sweep failed"),
                    }
                }
            }
        }

        tracing::info!("Presence sweeper loop ended");
    }
}

impl std::fmt::Debug for PresenceSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceSweeper")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
