use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use sql_gateway::config::load_dotenv;
use sql_gateway::{server, AppState, BlocklistValidator, GatewayConfig, MySqlConnector};

#[derive(Parser)]
#[command(name = "sql-gateway")]
#[command(about = "Read-only SQL query gateway over HTTP")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, env = "SQL_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "GATEWAY_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "GATEWAY_PORT")]
    port: Option<u16>,

    /// Append-only event log file
    #[arg(long, env = "GATEWAY_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log to stderr only
    #[arg(long)]
    no_log_file: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = load_dotenv(None);
    let cli = Cli::parse();

    let mut config = GatewayConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.no_log_file {
        config.logging.file = None;
    } else if let Some(log_file) = cli.log_file {
        config.logging.file = Some(log_file);
    }

    gateway_common::init_tracing("sql_gateway", config.logging.file.as_deref())?;
    if let Some(path) = env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }
    tracing::info!("Database target: {}", config.database.redacted_url());

    let state = AppState::new(
        Arc::new(MySqlConnector::new(&config.database)),
        Arc::new(BlocklistValidator::new()),
        config.database.name.clone(),
    );

    server::serve(&config.server, state).await
}
