use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use crate::config::Config;
use crate::directory::Directory;
use crate::http::{AppState, HttpServer};
use crate::sink::{EventSink, FileEventSink};
use crate::transport::{HttpSmsTransport, SmsTransport};

/// Main smsgwd server
///
/// Wires the immutable directory snapshot, the SMS transport and the event
/// sink into the HTTP server and runs until SIGINT/SIGTERM.
pub struct Server {
    /// Configuration
    config: Arc<Config>,

    /// Config file path (for reload via the admin endpoint)
    config_path: PathBuf,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
        }
    }

    /// Run the server until shutdown
    pub async fn run(self) -> Result<()> {
        let directory = Arc::new(Directory::from_config(&self.config));

        for receiver in directory.receivers() {
            info!(
                name = %receiver.name,
                mobiles = receiver.mobiles.len(),
                scheduled = receiver.schedule.as_ref().is_some_and(|s| s.enabled),
                "receiver configured"
            );
        }

        if let Some(argocd) = directory.argocd() {
            info!(
                enabled = argocd.enabled,
                app_mappings = argocd.app_exact.len(),
                prefix_mappings = argocd.app_prefix.len(),
                project_mappings = argocd.project.len(),
                namespace_mappings = argocd.namespace.len(),
                "argocd routing configured"
            );
        }

        let transport: Arc<dyn SmsTransport> = Arc::new(
            HttpSmsTransport::new(&self.config.transport)
                .context("failed to build SMS transport")?,
        );

        let sink: Arc<dyn EventSink> = Arc::new(
            FileEventSink::open(&self.config.sink.path)
                .context("failed to open event log")?,
        );

        let state = Arc::new(AppState::new(
            directory,
            transport,
            sink,
            Some(self.config_path.clone()),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let http_server = HttpServer::new(self.config.http.address, state);
        let server_handle = tokio::spawn(async move { http_server.run(shutdown_rx).await });

        info!(
            address = %self.config.http.address,
            event_log = %self.config.sink.path.display(),
            "smsgwd server started"
        );

        wait_for_shutdown().await;

        info!("shutdown signal received, stopping http server");
        let _ = shutdown_tx.send(true);

        server_handle
            .await
            .context("http server task panicked")?
            .context("http server failed")?;

        info!("smsgwd server stopped");

        Ok(())
    }
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("received SIGTERM");
        }
    }
}
