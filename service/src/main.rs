#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::net::SocketAddr;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use clap::Parser;
use gatekeeper_api::{config::Config, http::secure};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Serve an axum app behind the configured security sections.
#[derive(Debug, Parser)]
#[command(name = "gatekeeper", version, about)]
struct Cli {
    /// YAML configuration file. Missing files are ignored.
    #[arg(long, default_value = "config.yaml")]
    config: String,
}

// Health check handler
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Load and validate configuration first (fail-fast)
    let config = Config::load_from(&cli.config).map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .init();

    // Init banner so container logs clearly show startup
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "gatekeeper starting up"
    );

    let security = match config.security.to_dsl().build() {
        Ok(security) => security,
        Err(e) => {
            tracing::error!(error = %e, section = ?e.path(), "Security configuration rejected");
            anyhow::bail!("invalid security configuration: {e}");
        }
    };

    let app = secure(Router::new().route("/health", get(health_check)), &security)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let ip: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.host '{}': {e}", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
