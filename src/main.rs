//! pattern_controller dashboard gateway (v1)
//!
//! Sits between the browser UI and the control-plane API. Every `/api/*`
//! call is forwarded to the backend with the shared secret attached, and the
//! backend's answer comes back with the same status code.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────┐
//!                      │                    GATEWAY                      │
//!   Browser            │  ┌─────────┐    ┌──────────┐    ┌───────────┐  │
//!   /api/ops?limit=5 ──┼─▶│  http   │───▶│ routing  │───▶│ upstream  │──┼──▶ Control-plane
//!                      │  │ server  │    │ registry │    │  client   │  │    API
//!                      │  └─────────┘    └──────────┘    └─────┬─────┘  │    (X-Auth-Token)
//!                      │                                       │        │
//!   Browser            │  ┌─────────┐                          │        │
//!   same status, JSON ◀┼──│  relay  │◀─────────────────────────┘        │
//!                      │  └─────────┘                                   │
//!                      │                                                │
//!                      │  config · observability · lifecycle            │
//!                      └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use pattern_gateway::config::load_config;
use pattern_gateway::config::loader::ENV_BIND;
use pattern_gateway::lifecycle::startup;
use pattern_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "pattern-gateway")]
#[command(about = "Authenticated gateway for the pattern_controller dashboard", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides the file and GATEWAY_BIND.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let bind = cli.bind;
    let config = load_config(cli.config.as_deref(), move |key| match (key, &bind) {
        (ENV_BIND, Some(bind)) => Some(bind.clone()),
        _ => std::env::var(key).ok(),
    })?;

    logging::init_logging(&config.observability)?;

    tracing::info!("pattern-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = ?config.upstream,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
