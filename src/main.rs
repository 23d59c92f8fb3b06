// =============================================================================
// Pattern Scout — Main Entry Point
// =============================================================================
//
// `analyze` runs one analysis and prints it; `serve` exposes the same
// pipeline over the REST API.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analyzer;
mod api;
mod app_state;
mod config;
mod error;
mod indicators;
mod market_data;
mod patterns;
mod report;
mod signals;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::analyzer::PatternAnalyzer;
use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::market_data::YahooClient;
use crate::report::render_text;
use crate::types::Period;

#[derive(Debug, Parser)]
#[command(name = "pattern-scout", version, about = "Chart pattern and signal scanner")]
struct Cli {
    /// JSON config file; defaults are used when it is absent.
    #[arg(long, global = true, default_value = "scout_config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse one symbol and print the report.
    Analyze {
        /// Ticker symbol, e.g. AAPL or RELIANCE.NS (config default if omitted).
        symbol: Option<String>,

        /// One of 1mo, 3mo, 6mo, 1y, 2y.
        #[arg(long, short)]
        period: Option<Period>,

        /// Print the full report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Run the REST API.
    Serve {
        /// Listen address (overrides config and SCOUT_BIND_ADDR).
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    config.apply_env_overrides();

    // ── 2. Provider & analyzer ───────────────────────────────────────────
    let provider = YahooClient::new(&config.provider)?;
    let analyzer = PatternAnalyzer::new(Arc::new(provider));

    match cli.command {
        Command::Analyze {
            symbol,
            period,
            json,
        } => {
            let symbol = symbol.unwrap_or_else(|| config.default_symbol.clone());
            let period = period.unwrap_or(config.default_period);

            let report = analyzer.analyze(&symbol, period).await;
            if json {
                let out = serde_json::to_string_pretty(&report)
                    .context("failed to serialise report")?;
                println!("{out}");
            } else {
                print!("{}", render_text(&report));
            }
        }
        Command::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let state = Arc::new(AppState::new(config, analyzer));
            let app = api::rest::router(state);

            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
            info!(addr = %bind_addr, "API server listening");

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("API server failed")?;

            info!("Pattern Scout shut down complete.");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
