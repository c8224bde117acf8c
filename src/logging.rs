//! Logging infrastructure for dashmart.
//!
//! Logs go to the console and to a daily-rolling file in the platform data
//! directory. Use `RUST_LOG` to control verbosity (defaults to `info`).
//!
//! ```no_run
//! dashmart::logging::init().expect("Failed to initialize logging");
//! tracing::info!("Build started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

/// Log directory based on platform conventions:
/// `~/.local/share/dashmart/logs` on Linux, the app-data equivalent elsewhere.
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;

    let log_dir = base_dir.join("dashmart").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Initializes the logging system with console and file output.
///
/// The file target rolls daily as `dashmart.log.YYYY-MM-DD`. Safe to call
/// once at startup; a second call returns an error from the subscriber.
pub fn init() -> Result<()> {
    let log_dir = get_log_dir()?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "dashmart.log");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true);

    let console_layer = fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}
