//! Contact Terminal - main entry point.
//!
//! Starts the guided contact form by default. Logging goes to stderr, or to
//! a file with `--log-file` so it stays out of the rendered terminal.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use contact_cli::cli::{Cli, dispatch_command};

/// Guard that flushes the log file when dropped.
struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

fn build_filter(level: &str) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    }
}

/// Send logs to `path`, appending.
fn setup_file_logging(path: &Path, level: &str) -> Result<LogGuard> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(file_layer)
        .init();

    Ok(LogGuard { _guard: guard })
}

fn setup_stderr_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_level = std::env::var("CONTACT_LOG_LEVEL").ok();
    let level = cli.effective_log_level(env_level.as_deref()).as_filter_str();

    let log_guard = match &cli.session.log_file {
        Some(path) => Some(setup_file_logging(path, level)?),
        None => {
            setup_stderr_logging(level);
            None
        }
    };

    let code = dispatch_command(cli).await?;
    drop(log_guard);
    std::process::exit(code);
}
