//! Message board (v1)
//!
//! Stores short text messages in MongoDB and serves the ten most recent.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                    MESSAGE BOARD                      │
//!                     │                                                       │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌─────────────────┐   │
//!   ──────────────────┼─▶│   http   │──▶│ handlers │──▶│ MessageGateway  │   │
//!                     │  │  server  │   │ validate │   │ order/cap/stamp │   │
//!                     │  └──────────┘   └──────────┘   └────────┬────────┘   │
//!                     │                                          │            │
//!                     │                                          ▼            │
//!   Client Response   │                                 ┌─────────────────┐   │
//!   ◀─────────────────┼─────────────────────────────────│  MessageStore   │◀──┼── MongoDB
//!                     │                                 └─────────────────┘   │
//!                     │  ┌─────────────────────────────────────────────────┐  │
//!                     │  │              Cross-Cutting Concerns              │  │
//!                     │  │  config · resilience (connect retries)          │  │
//!                     │  │  lifecycle (startup/shutdown) · observability   │  │
//!                     │  └─────────────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use message_board::config::loader;
use message_board::lifecycle::{signals, Application};
use message_board::observability::logging;

#[derive(Parser)]
#[command(name = "message-board")]
#[command(about = "HTTP message board backed by MongoDB", long_about = None)]
struct Args {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logging is configured by the file/environment, so it cannot report this.
    let config = match loader::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("message-board: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "message-board starting");
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        backend = %config.store.backend,
        database = %config.store.database,
        collection = %config.store.collection,
        max_attempts = config.retry.max_attempts,
        retry_delay_ms = config.retry.delay_ms,
        serve_static = config.frontend.serve_static,
        "Configuration loaded"
    );

    let app = match Application::start(config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    signals::shutdown_signal().await;
    app.close().await;

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
