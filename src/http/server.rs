//! HTTP server and shared request state.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{watch, RwLock};
use tracing::info;

use crate::config::Config;
use crate::directory::Directory;
use crate::routing::Engine;
use crate::sink::EventSink;
use crate::telemetry::counters;
use crate::transport::SmsTransport;

use super::handlers::{
    argocd_handler, health_handler, live_handler, metrics_handler, mobiles_handler,
    ready_handler, receivers_handler, reload_handler, sms_handler, stats_handler,
};

/// Shared state behind every handler.
///
/// The directory snapshot is immutable; a reload builds a new snapshot and
/// swaps the `Arc` under a write lock held only for the assignment, so
/// in-flight requests keep the snapshot they started with.
pub struct AppState {
    start_time: Instant,
    directory: RwLock<Arc<Directory>>,
    transport: Arc<dyn SmsTransport>,
    sink: Arc<dyn EventSink>,
    config_path: Option<PathBuf>,
    processed: AtomicU64,
    ignored: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    reload_count: AtomicU64,
}

impl AppState {
    pub fn new(
        directory: Arc<Directory>,
        transport: Arc<dyn SmsTransport>,
        sink: Arc<dyn EventSink>,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            directory: RwLock::new(directory),
            transport,
            sink,
            config_path,
            processed: AtomicU64::new(0),
            ignored: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            reload_count: AtomicU64::new(0),
        }
    }

    /// Current directory snapshot.
    pub async fn directory(&self) -> Arc<Directory> {
        self.directory.read().await.clone()
    }

    /// Build an engine over the current snapshot.
    pub async fn engine(&self) -> Engine {
        Engine::new(
            self.directory().await,
            self.transport.clone(),
            self.sink.clone(),
        )
    }

    /// Get uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn inc_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn ignored(&self) -> u64 {
        self.ignored.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn reload_count(&self) -> u64 {
        self.reload_count.load(Ordering::Relaxed)
    }

    /// Rebuild the directory snapshot from the config file and swap it in.
    ///
    /// Only routing data is refreshed; transport and sink keep their
    /// startup configuration.
    pub async fn reload_config(&self) -> Result<ReloadResult, String> {
        let Some(path) = &self.config_path else {
            return Err("no config file path to reload from".to_string());
        };

        info!(path = %path.display(), "reloading configuration");

        let config = Config::load(path).map_err(|e| format!("failed to load config: {e:#}"))?;
        let directory = Arc::new(Directory::from_config(&config));
        let receivers = directory.receivers().len();

        {
            let mut current = self.directory.write().await;
            *current = directory;
        }

        let count = self.reload_count.fetch_add(1, Ordering::Relaxed) + 1;
        counters::config_reloaded();

        info!(receivers, reload_count = count, "configuration reloaded");

        Ok(ReloadResult {
            success: true,
            message: "configuration reloaded".to_string(),
            reload_count: count,
            receivers,
        })
    }
}

/// Result of a config reload operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReloadResult {
    pub success: bool,
    pub message: String,
    pub reload_count: u64,
    pub receivers: usize,
}

/// Build the router with all webhook and admin routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Inbound webhooks
        .route("/sms", post(sms_handler))
        .route("/argocd", post(argocd_handler))
        .route("/argocd/webhook", post(argocd_handler))
        // Kubernetes-style health endpoints (plus legacy aliases)
        .route("/healthz", get(health_handler))
        .route("/health", get(health_handler))
        .route("/livez", get(live_handler))
        .route("/readyz", get(ready_handler))
        .route("/ready", get(ready_handler))
        // Directory queries
        .route("/mobiles", get(mobiles_handler))
        .route("/receivers", get(receivers_handler))
        // Metrics and stats
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        // Config management
        .route("/config/reload", post(reload_handler))
        .with_state(state)
}

/// Webhook HTTP server.
pub struct HttpServer {
    address: std::net::SocketAddr,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(address: std::net::SocketAddr, state: Arc<AppState>) -> Self {
        Self { address, state }
    }

    /// Run until the shutdown signal flips.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> std::io::Result<()> {
        let router = build_router(self.state);

        info!(address = %self.address, "starting http server");

        let listener = TcpListener::bind(self.address).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
                info!("http server shutting down");
            })
            .await?;

        Ok(())
    }
}
