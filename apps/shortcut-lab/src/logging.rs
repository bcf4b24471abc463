//! File logging.
//!
//! The terminal belongs to the UI, so events go to a daily log file under the
//! platform data directory. Filter with `RUST_LOG`, e.g.
//! `RUST_LOG=shortcut_engine=trace`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "shortcut_engine=debug,shortcut_lab=debug";

pub fn logs_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "shortcut-lab").map(|d| d.data_dir().join("logs"))
}

/// Install the file subscriber. Keep the guard alive until exit so buffered
/// lines are flushed.
pub fn init() -> Result<Option<WorkerGuard>> {
    let Some(dir) = logs_dir() else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, "shortcut-lab.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;
    Ok(Some(guard))
}
