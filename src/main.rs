//! TasCraft MCP Server - Main Entry Point
//!
//! Parses the command line, sets up logging on stderr (stdout carries the MCP
//! traffic) and serves the `tascraft` library over stdio.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use tascraft::{BackendConfig, Config, TasCraftServer, WeekStart};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// TasCraft MCP Server - gamified quest log via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the local save file (TOML)
    file: String,

    /// Base URL of the hosted backend
    #[arg(long, env = "TASCRAFT_BACKEND_URL")]
    backend_url: Option<String>,

    /// Public API key of the hosted backend
    #[arg(long, env = "TASCRAFT_BACKEND_KEY", hide_env_values = true)]
    backend_key: Option<String>,

    /// First day of the week for the weekly boss: sunday or monday
    #[arg(long, default_value = "sunday")]
    week_start: WeekStart,

    /// Start offline even when a backend is configured
    #[arg(long)]
    offline: bool,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            data_file: self.file.into(),
            backend: BackendConfig::from_parts(self.backend_url, self.backend_key),
            week_start: self.week_start,
            offline: self.offline,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tascraft=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = args.into_config();
    info!(
        file = %config.data_file.display(),
        backend = config.backend.is_some(),
        offline = config.offline,
        week_start = %config.week_start,
        "starting TasCraft MCP server"
    );

    let server = TasCraftServer::new(config)?;
    serve_stdio(server).await?;
    Ok(())
}
