//! ttts - unified CLI for the match server and the terminal client.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ttts_server::cli::{Cli, Command};
use ttts_server::{Acceptor, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            move_timeout,
            single,
        } => {
            initialize_tracing("info,ttts_server=debug");
            run_server(config, host, port, move_timeout, single).await
        }
        Command::Play { host, port } => {
            initialize_tracing("warn");
            ttts_server::client::play(&host, port).await
        }
    }
}

/// Run the match server until Ctrl+C, or until one match ends with `--single`
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    move_timeout: Option<u64>,
    single: bool,
) -> Result<()> {
    let mut config = ServerConfig::load(config_path.as_deref())?;

    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(secs) = move_timeout {
        config = config.with_move_timeout_secs(secs);
    }
    if single {
        config = config.with_single_match(true);
    }
    config.validate()?;
    info!(?config, "Starting ttts server");

    let acceptor = Acceptor::bind(&config).await?;

    tokio::select! {
        result = ttts_server::serve(acceptor, config) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down server"),
    }

    Ok(())
}

fn initialize_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
