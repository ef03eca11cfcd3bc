//! # reCAPTCHA Gate
//!
//! Accepts a login-like form submission only after its reCAPTCHA v2
//! challenge response has been verified against Google's siteverify API.
//!
//! ## Architecture
//! ```text
//! Browser → Gate → siteverify (www.google.com/recaptcha/api)
//!             ↓
//!       LoginHandler
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod login;
mod routes;
mod siteverify;
mod state;

#[cfg(test)]
mod testing;

use config::AppConfig;
use state::AppState;

/// reCAPTCHA Gate - reCAPTCHA v2 verification in front of a login endpoint
#[derive(Parser, Debug)]
#[command(name = "recaptcha-gate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/recaptcha-gate.toml")]
    config: String,

    /// Listen host (overrides config)
    #[arg(long, env = "LISTEN_HOST")]
    host: Option<String>,

    /// Listen port (overrides config)
    #[arg(short, long, env = "LISTEN_PORT")]
    port: Option<u16>,

    /// reCAPTCHA secret (overrides config)
    #[arg(long, env = "RECAPTCHA_SECRET", hide_env_values = true)]
    recaptcha_secret: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed arguments
    let dotenv = dotenvy::dotenv();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!(
        "🔐 Starting reCAPTCHA Gate v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "Failed to load .env, continuing without it"),
    }

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!(
        expected_hostname = %config.recaptcha.hostname,
        timeout_secs = config.recaptcha.timeout_secs,
        "📋 Configuration loaded"
    );
    if config.recaptcha.secret.is_empty() {
        warn!("recaptcha.secret is empty, siteverify will answer missing-input-secret");
    }

    let listen_addr = config.listen_addr();

    // Initialize application state
    let state = AppState::new(config)?;

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    info!("🚀 Server is running on {}", listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("👋 reCAPTCHA Gate shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown signal received"),
        Err(err) => warn!(error = %err, "Failed to listen for Ctrl+C, shutting down"),
    }
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}
