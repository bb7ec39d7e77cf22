//! procd daemon — entry point for running a procd server.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use procd_rpc::RegistryBuilder;
use procd_server::{Server, ServerConfig, ServerMetrics};
use procd_types::Schema;
use serde_json::json;

#[derive(Parser)]
#[command(name = "procd-daemon", about = "procd RPC server daemon")]
struct Cli {
    /// Path to a TOML configuration file. Missing fields fall back to
    /// built-in defaults; overrides below are applied on top of either.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the configured log level ("trace", "debug", "info", ...).
    #[arg(long)]
    log_level: Option<String>,

    /// Override the configured log format ("human" or "json").
    #[arg(long)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the server and block until interrupted.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_toml_file(
            path.to_str().ok_or_else(|| anyhow::anyhow!("config path is not valid UTF-8"))?,
        )?,
        None => ServerConfig::default(),
    };

    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    if let Some(log_format) = cli.log_format {
        config.log_format = log_format;
    }

    procd_server::init_logging(config.log_format(), &config.log_level);

    match cli.command {
        Command::Run => run(config).await,
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let registry = build_registry()?;
    let metrics = Arc::new(ServerMetrics::new());
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown_budget = procd_utils::format_duration(config.shutdown_timeout.as_secs());

    tracing::info!(addr = %addr, shutdown_budget = %shutdown_budget, "starting procd daemon");
    let server = Server::listen(addr, registry, config, metrics).await?;
    tracing::info!(addr = %server.local_addr(), "listening");

    server.run_until_signal().await;

    Ok(())
}

/// Registers the example procedures used throughout the test scenarios:
/// a trivial process-wide counter, and a schema-validated echo.
fn build_registry() -> anyhow::Result<procd_rpc::Registry> {
    let mut builder = RegistryBuilder::new();

    let counter = Arc::new(AtomicI64::new(0));
    builder.register(
        "counter",
        Arc::new(move |_ctx, _params| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!(n))
        }),
        None,
        None,
    )?;

    let validate_schema = Schema::object(
        &["message", "count"],
        vec![("message", Schema::String), ("count", Schema::Number)],
    );
    builder.register(
        "validate",
        Arc::new(|_ctx, params| Ok(params.unwrap_or(serde_json::Value::Null))),
        Some(validate_schema),
        None,
    )?;

    Ok(builder.build())
}
