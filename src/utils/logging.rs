use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self, MakeWriter, format::Writer, time::FormatTime};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const ERROR_LOG_FILE: &str = "error.log";

// 10/18/2026 03:04:05 PM
struct LogTimestamp;

impl FormatTime for LogTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%m/%d/%Y %I:%M:%S %p"))
    }
}

/// Where `error.log` goes when no directory is given
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(super::project_dirs()?.data_dir().to_path_buf())
}

/// Install the console logger and the append-only error log in `log_dir`.
///
/// The returned guard flushes the error log on drop and must be held for the
/// lifetime of the process.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, ERROR_LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry()
        .with(console)
        .with(error_log_layer(writer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// One line per error: timestamp and message, no colours
pub(crate) fn error_log_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .with_timer(LogTimestamp)
        .with_filter(LevelFilter::ERROR)
}
