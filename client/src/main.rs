use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gateway_common::{QueryRequest, ReportRequest};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "sql-gateway-client")]
#[command(about = "Command-line client for the SQL gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gateway base URL
    #[arg(long, env = "SQL_GATEWAY_URL", default_value = "http://localhost:5000")]
    url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the gateway can reach its database
    Health,
    /// Run a read-only statement
    Query {
        /// SQL statement
        sql: String,
        /// Positional parameter (JSON literal, or plain text)
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,
    },
    /// Print the database schema
    Schema,
    /// List the report catalogue
    Reports,
    /// Run a named report
    Report {
        /// Report name
        name: String,
        /// Positional parameter (JSON literal, or plain text)
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,
    },
}

/// `42` binds as a number, `null` as NULL, anything unparsable as text
fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    gateway_common::init_tracing("sql_gateway_client", None)?;

    let cli = Cli::parse();
    let base = cli.url.trim_end_matches('/');
    let client = reqwest::Client::new();

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/api/health", base)),
        Commands::Query { sql, params } => client
            .post(format!("{}/api/query", base))
            .json(&QueryRequest::new(
                sql,
                params.iter().map(|p| parse_param(p)).collect(),
            )),
        Commands::Schema => client.get(format!("{}/api/schema", base)),
        Commands::Reports => client.get(format!("{}/api/reports", base)),
        Commands::Report { name, params } => client
            .post(format!("{}/api/reports/{}", base, name))
            .json(&ReportRequest {
                params: params.iter().map(|p| parse_param(p)).collect(),
            }),
    };

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to reach gateway at {}", base))?;
    let status = response.status();
    tracing::debug!("Gateway answered {}", status);

    let body: Value = response
        .json()
        .await
        .context("Gateway returned a non-JSON body")?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        anyhow::bail!("Gateway error: {}", status);
    }
    Ok(())
}
