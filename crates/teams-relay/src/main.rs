use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use teams_relay::config::Config;
use teams_relay::graph::{GraphClient, build_http_client};
use teams_relay::relay::Relay;
use teams_relay::server::{AppState, build_app};

/// Relay direct messages to Microsoft Teams users.
#[derive(Parser)]
#[command(name = "teams-relay")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "teams-relay.yaml")]
    config: PathBuf,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("teams_relay=debug,info")
        } else {
            EnvFilter::new("teams_relay=info,warn")
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config.apply_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let credentials = config.graph.credentials()?;
    info!(
        client_id = %credentials.client_id,
        tenant_id = %credentials.tenant_id,
        authority = %credentials.authority_url,
        api_base = %config.graph.api_base_url,
        "loaded service credentials"
    );

    let http = build_http_client(config.graph.timeout())?;
    let graph = GraphClient::new(http, credentials, &config.graph.api_base_url)?;
    let state = AppState {
        relay: Relay::new(Arc::new(graph)),
    };
    let app = build_app(state, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "teams-relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("teams-relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
