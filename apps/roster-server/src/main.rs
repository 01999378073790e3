mod config;
mod datasource;
mod gateway;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::datasource::{LatencyRange, UserDirectory};
use crate::gateway::{health_check, query, SharedDirectory};

#[derive(Parser, Debug)]
#[command(name = "roster-server")]
#[command(about = "Mock user-directory query server")]
struct Cli {
    /// Port to listen on (overrides ROSTER_PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Serve responses immediately instead of simulating latency
    #[arg(long)]
    no_delay: bool,
}

#[tokio::main]
async fn main() {
    // Default to INFO level if RUST_LOG is not set
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let port = cli.port.unwrap_or(config.port);
    let latency = if cli.no_delay {
        LatencyRange::disabled()
    } else {
        LatencyRange::from_millis(config.delay_min_ms, config.delay_max_ms)
    };

    info!(
        port,
        delay_min_ms = latency.min.as_millis() as u64,
        delay_max_ms = latency.max.as_millis() as u64,
        "starting roster server"
    );

    let directory: SharedDirectory = Arc::new(UserDirectory::new(config.seed, latency));

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/query", post(query))
        .with_state(directory)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{port}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("roster server listening on {addr}");

    let serve = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = serve.await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
