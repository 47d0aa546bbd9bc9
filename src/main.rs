use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use smsgwd::bootstrap::Server;
use smsgwd::config::Config;
use smsgwd::telemetry::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(name = "smsgwd")]
#[command(author, version, about = "SMS gateway for operational alerts and deployment notifications")]
struct Args {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Validate config and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (to get log settings)
    let config = Config::load(&args.config)?;

    let tracing_config = TracingConfig {
        service_name: "smsgwd".to_string(),
        log_level: config.telemetry.log_level.clone(),
        json_logs: config.telemetry.json_logs,
    };

    init_tracing(&tracing_config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "starting smsgwd"
    );

    info!(
        receivers = config.receivers.len(),
        argocd = config.argocd.is_some(),
        "configuration loaded"
    );

    // Validate only mode
    if args.validate {
        info!("configuration is valid");
        return Ok(());
    }

    let server = Server::new(config, args.config);
    server.run().await?;

    Ok(())
}
