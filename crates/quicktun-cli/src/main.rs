//! Quicktun CLI - create and maintain an ephemeral quick tunnel
//!
//! Reuses persisted tunnel credentials when present, otherwise provisions a
//! new quick tunnel, announces its public URL to a local callback listener
//! and hands the session to the configured connector command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quicktun_session::{
    CallbackNotifier, ConfigStore, ProvisioningClient, SessionOrchestrator, SessionSettings,
};

mod connector;
use connector::ExecConnector;

/// Quicktun - ephemeral quick tunnel session manager
#[derive(Parser, Debug)]
#[command(name = "quicktun")]
#[command(about = "Creates a quick tunnel, maintains the credentials and notifies a local listener of the tunnel URL", long_about = None)]
#[command(version = env!("GIT_TAG"))]
#[command(long_version = concat!(env!("GIT_TAG"), "\nCommit: ", env!("GIT_HASH"), "\nBuilt: ", env!("BUILD_TIME")))]
struct Cli {
    /// Filepath at which to read/write the tunnel credentials
    #[arg(long, default_value = "./credentials.json", env = "TUNNEL_CONFIG")]
    credentials: PathBuf,

    /// Base URL of the local server hosting the callback listener
    #[arg(long, default_value = "http://localhost:8080", env = "TUNNEL_URL")]
    url: String,

    /// Callback path the tunnel URL is announced to, relative to --url
    #[arg(long, default_value = "callback", env = "CALLBACK")]
    callback: String,

    /// URL of the service which manages unauthenticated quick tunnels
    #[arg(long, default_value = "https://api.trycloudflare.com", env = "TUNNEL_QUICK_SERVICE")]
    quick_service: String,

    /// Connector command to run once credentials are available
    #[arg(long, default_value = "cloudflared")]
    connector: String,

    /// Extra argument passed to the connector command (repeatable)
    #[arg(long = "connector-arg")]
    connector_args: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    // Ctrl-C aborts the callback retry loop instead of leaving the process
    // stuck waiting on a listener that will never answer.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let orchestrator = SessionOrchestrator::new(
        ConfigStore::new(&cli.credentials),
        ProvisioningClient::new(&cli.quick_service)?,
        CallbackNotifier::default(),
        ExecConnector::new(cli.connector, cli.connector_args),
        SessionSettings {
            local_base_url: cli.url,
            callback_path: cli.callback,
        },
    );

    if let Err(e) = orchestrator.run(&cancel).await {
        error!("{e}");
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(log_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to initialize logging filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}
