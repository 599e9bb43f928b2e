//! Lifeboard Server
//!
//! Run with: cargo run -- --config ./config.toml
//!
//! # Configuration
//!
//! Settings come from a TOML file (see `--print-config`), then environment
//! variables, then command-line flags:
//! - `LIFEBOARD_DB_PATH`: SQLite database file
//! - `LIFEBOARD_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `LIFEBOARD_API_PORT`: Port to listen on (default: 5000)
//! - `LIFEBOARD_LOG_LEVEL`: Log level (default: info)
//! - `LIFEBOARD_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter directive, overrides the log level

use anyhow::Context;
use clap::Parser;
use lifeboard::api::{serve, AppState};
use lifeboard::config::{generate_default_config, Config};
use lifeboard::storage::Database;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lifeboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal tracking dashboard for study, courses, gym, basketball and schedule")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<String>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_default(),
    };

    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    if let Some(database) = cli.database {
        config.database.path = database;
    }

    init_tracing(&config);

    tracing::info!("Starting Lifeboard v{}", env!("CARGO_PKG_VERSION"));

    let db_config = config.database.to_storage();
    tracing::info!("Database: {:?}", db_config.path);

    let db = Database::open(&db_config)
        .with_context(|| format!("Failed to open database {}", db_config.path.display()))?;

    let api_config = config.api.to_api();
    let state = AppState::new(db, api_config.clone());

    serve(state, &api_config)
        .await
        .context("API server failed")?;

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "lifeboard={level},tower_http={level}",
            level = config.logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
