//! Command-line interface

use crate::server::{self, config::AppConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Factotum - AI business assistant
#[derive(Parser)]
#[command(name = "factotum", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Bind address override
        #[arg(long)]
        host: Option<String>,
        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List the skills the configured assembly registers
    Skills,
}

/// Run the parsed command
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting Factotum v{}", env!("CARGO_PKG_VERSION"));
            server::run(config).await
        }
        Commands::Skills => {
            let registry = server::build_registry(&config)?;
            for definition in registry.definitions() {
                println!("{}", definition.catalogue_line());
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AppConfig::from_env()),
    }
}
