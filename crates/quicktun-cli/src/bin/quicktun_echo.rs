//! Manual-verification server for quicktun
//!
//! Exposes `/ping` for liveness checks and `/callback` as a listener for the
//! tunnel URL announcement. Point a tunnel at it, run `quicktun`, and the
//! announced URL shows up in the log.

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Quicktun echo - local callback listener for manual verification
#[derive(Parser, Debug)]
#[command(name = "quicktun-echo")]
#[command(about = "Local test server receiving quick tunnel URL callbacks", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

async fn ping() -> &'static str {
    "pong"
}

async fn callback(body: String) -> &'static str {
    info!(url = %body, "Tunnel URL announced");
    "success"
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&cli.log_level))
        .context("Failed to initialize logging filter")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = Router::new()
        .route("/ping", get(ping))
        .route("/callback", post(callback));

    let listener = TcpListener::bind(&cli.listen)
        .await
        .context(format!("Failed to bind {}", cli.listen))?;
    info!(addr = %cli.listen, "Echo server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
