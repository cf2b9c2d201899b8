//! membrokerd — the broker daemon.
//!
//! Single binary that assembles the broker:
//! - YAML config (capacity, state file, listen port, catalog)
//! - File-backed state store
//! - Broker REST API
//!
//! # Usage
//!
//! ```text
//! membrokerd --config /etc/membroker/broker.yml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "membrokerd", about = "File-backed service broker daemon")]
struct Cli {
    /// Path to the broker configuration file.
    #[arg(long, default_value = "broker.yml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "info,membrokerd=debug,membroker_state=debug,membroker_api=debug"
                        .parse()
                        .unwrap()
                }),
        )
        .init();

    let cli = Cli::parse();

    let config = membroker_config::Config::from_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    info!(config = ?cli.config, capacity = config.capacity, "configuration loaded");

    // The broker cannot operate without durable state; an unreadable or
    // malformed state file aborts startup.
    let store = membroker_state::FileStore::open(&config.state_file, config.capacity)
        .with_context(|| format!("opening state store at {}", config.state_file.display()))?;
    info!(path = ?config.state_file, "state store opened");

    let router = membroker_api::build_router(store, config.catalog);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));

    info!(%addr, "broker API starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("broker stopped");
    Ok(())
}
