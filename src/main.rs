//! UF Backwash - membrane pressure prediction service
//!
//! Serves transmembrane-pressure predictions, backwash schedules and
//! efficiency metrics for ultrafiltration membranes over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (0.0.0.0:8000)
//! cargo run --release
//!
//! # Explicit config and JSON logs
//! ./uf-backwash --config uf_backwash.toml --log-format json
//! ```
//!
//! # Environment Variables
//!
//! - `UF_BACKWASH_CONFIG`: Path to a TOML config file
//! - `UF_SERVER_ADDR`: Bind address override
//! - `UF_CORS_ORIGINS`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use uf_backwash::api::{create_app, ApiState};
use uf_backwash::config::ServiceConfig;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "uf-backwash")]
#[command(about = "UF membrane backwash prediction service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8000")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML config file. Skips the usual lookup order.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_format);

    let config = match &args.config {
        Some(path) => ServiceConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServiceConfig::load(),
    };

    let server_addr = args.addr.clone().unwrap_or_else(|| config.resolved_addr());

    info!(
        version = %config.model.version,
        max_time_steps = config.model.max_time_steps,
        history_capacity = config.history.capacity,
        seeded = config.simulation.seed.is_some(),
        "UF backwash service starting"
    );

    let app = create_app(ApiState::new(config));

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("HTTP server listening on {}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await;

    match result {
        Ok(()) => {
            info!("Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}
