//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to the platform data dir (e.g.
/// `~/.local/share/chargedeck/logs/`) -- never to stdout, which belongs to
/// the terminal UI. Log level is controlled by the `CHARGEDECK_LOG`
/// environment variable.
///
/// # Examples
/// ```bash
/// CHARGEDECK_LOG=debug chargedeck
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "chargedeck.log");

    // Default to info, allow override via CHARGEDECK_LOG
    let env_filter = EnvFilter::try_from_env("CHARGEDECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("chargedeck=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("chargedeck starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("chargedeck").join("logs"))
}
