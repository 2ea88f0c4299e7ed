//! Tracing initialization
//!
//! Provides the standard logging setup shared by the gateway service and
//! its command-line client.

use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
///
/// Sets up logging to stderr with:
/// - Environment-based filtering via RUST_LOG
/// - Default log level of `info` for the specified crate
/// - An optional second sink appending plain-text events to `log_file`
///
/// Set `LOG_FORMAT=json` for structured JSON output on stderr. The log file
/// always receives human-readable lines, one event per line.
///
/// # Arguments
///
/// * `crate_name` - The crate whose events default to `info` (e.g., "sql_gateway")
/// * `log_file` - Path of the append-only event log, if any
///
/// # Example
///
/// ```rust,ignore
/// gateway_common::init_tracing("sql_gateway", Some(Path::new("sql_gateway.log")))?;
/// ```
pub fn init_tracing(crate_name: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
