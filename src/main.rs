use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use pool_proxy::config::{load_config, ProxyConfig};
use pool_proxy::{observability, store, HttpServer, Shutdown};

/// Round-robin reverse-proxy load balancer.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init("pool_proxy=debug,tower_http=debug");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        pool = %config.pool.name,
        store = ?config.pool.store,
        backends = config.pool.initial_url_list().len(),
        "configuration loaded"
    );

    let store = store::build(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
