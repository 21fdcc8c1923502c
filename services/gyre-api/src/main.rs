//! Gyre API service.
//!
//! HTTP server wrapping the pre-built MITgcm baroclinic gyre tutorial:
//! accepts simulation jobs, runs the model and serves the merged results.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use gyre_api::server;
use gyre_api::state::AppState;
use simulation::RunConfig;

#[derive(Parser, Debug)]
#[command(name = "gyre-api")]
#[command(about = "Simulation job server for the MITgcm baroclinic gyre tutorial")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8087", env = "GYRE_LISTEN_ADDR")]
    listen: String,

    /// Run configuration file
    #[arg(short, long, default_value = "config/gyre.yaml", env = "GYRE_CONFIG_FILE")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting gyre API server");

    // Load and validate the run configuration
    let config = match RunConfig::from_yaml_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %args.config.display(), error = %e, "Failed to load run configuration");
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        error!(error = %e, "Run configuration is not usable");
        std::process::exit(1);
    }

    info!(
        binary = %config.binary.display(),
        run_dir = %config.run_dir.display(),
        "Loaded run configuration"
    );

    let state = Arc::new(AppState::new(config));

    let addr: SocketAddr = args.listen.parse()?;

    server::start_server(state, addr).await
}
