//! Bloocube account-linking server.
//!
//! Wires configuration, logging and the HTTP surface together, then serves
//! until SIGINT or SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use bloocube::config::Config;
use bloocube::{AppState, build_app};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Bloocube social account linking server.
///
/// Individual settings can be overridden with `BLOOCUBE_*` variables (see
/// bloocube.toml); `RUST_LOG` overrides the log filter.
#[derive(Parser, Debug)]
#[command(name = "bloocube", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, env = "BLOOCUBE_CONFIG", default_value = "bloocube.toml")]
    config: PathBuf,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = Cli::parse().config;

    let config = Config::load(&config_path)?;
    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        overrides = config.env_overrides.all().len(),
        "Starting bloocube"
    );
    if !config.app.single_use_state {
        tracing::warn!("Anti-forgery tokens are reusable (app.single_use_state = false)");
    }

    let listen_addr = config.listen_addr();
    let state = AppState::new(config);
    let app = build_app(state);

    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!(addr = %listen_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tracing initialization
// ---------------------------------------------------------------------------

/// Filter used when `RUST_LOG` is unset.
fn default_filter(level: &str) -> String {
    format!("bloocube={level},tower_http={level},warn")
}

/// Set up the tracing subscriber based on configuration.
fn init_tracing(config: &Config) {
    // RUST_LOG env var takes precedence over config file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.logging.level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

// ---------------------------------------------------------------------------
// Graceful shutdown
// ---------------------------------------------------------------------------

/// Wait for a shutdown signal (SIGTERM or SIGINT / Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C)");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM");
        }
    }
}
