//! budgetbaba - track incomes, expenses and categories from the terminal.
//!
//! Each invocation runs one command against the budget API. The login
//! session is kept on disk between invocations.

mod app;
mod cli;
mod commands;
mod ui;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use budgetbaba_core::{AppContext, Config};

use app::App;
use cli::Cli;

/// File name prefix for the daily log files
const LOG_FILE_PREFIX: &str = "budgetbaba.log";

/// Initialize the tracing subscriber for logging.
///
/// Stderr follows `RUST_LOG` (default `warn`). When a data directory is
/// available, debug logs from this application also go to a daily file there.
/// The returned guard flushes the file writer when dropped.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_filter(filter);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("budgetbaba=debug,budgetbaba_core=debug"));
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env();

    let data_dir = config.data_dir().ok();
    if let Some(ref dir) = data_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Cannot create data directory {}: {}", dir.display(), e);
        }
    }
    let _guard = init_tracing(data_dir.as_deref().filter(|d| d.is_dir()));
    info!(api = %config.api_base_url, "budgetbaba starting");

    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    let ctx = match AppContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            ui::notify::error(&format!("Failed to start: {:#}", e));
            return ExitCode::FAILURE;
        }
    };

    App::new(ctx).run(cli.command).await
}
