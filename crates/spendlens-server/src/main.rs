//! SpendLens analytics server
//!
//! Serves per-agent spend analytics over the LiteLLM `LiteLLM_SpendLogs`
//! table.
//!
//! Usage:
//! ```bash
//! # With config file
//! spendlens-server --config config.yaml
//!
//! # Or with environment variables
//! DATABASE_URL=postgres://localhost/litellm spendlens-server
//!
//! # With both (env vars override config)
//! DATABASE_URL=postgres://localhost/litellm spendlens-server --config config.yaml
//! ```

mod config;

use clap::Parser;
use config::ServerConfig;
use spendlens_api::{ApiConfig, ApiServer};
use spendlens_store_postgres::{PgSpendStore, PgStoreConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// SpendLens - LiteLLM spend log analytics API
#[derive(Parser)]
#[command(name = "spendlens-server")]
#[command(about = "Analytics API over LiteLLM spend logs", long_about = None)]
struct Cli {
    /// Path to configuration file (YAML or TOML)
    #[arg(short, long, value_name = "FILE", env = "SPENDLENS_CONFIG")]
    config: Option<String>,

    /// Host to bind to (overrides config)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path, e))?,
        None => ServerConfig::default(),
    };
    config.merge_env();

    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    init_logging(&config)?;

    info!(
        "Starting SpendLens analytics server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let database_url = config.database.url.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "No database URL configured. Set DATABASE_URL or database.url in the config file"
        )
    })?;

    let pool_config = PgStoreConfig::new()
        .with_max_connections(config.database.max_connections)
        .with_min_connections(config.database.min_connections)
        .with_acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs));

    // A missing database at startup is fatal; handlers deal with failures
    // that happen after the pool is up.
    let store = PgSpendStore::with_config(&database_url, pool_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    info!("Connected to PostgreSQL spend log store");

    let api_config = ApiConfig {
        host: config.host.clone(),
        port: config.port,
    };

    ApiServer::new(api_config, Arc::new(store)).serve().await
}

fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Suppress per-query sqlx logs unless explicitly re-enabled via RUST_LOG
    let mut filter = EnvFilter::new(format!("{}", log_level));
    match "sqlx=warn".parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Failed to set sqlx log filter: {}", e),
    }

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
