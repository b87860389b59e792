//! Tracing subscriber setup: a console layer plus an optional append-only
//! log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.level`. The returned guard flushes the file
/// writer on drop and must live as long as the process. Fails if a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> std::io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false);

    let (file_layer, guard) = if config.file.as_os_str().is_empty() {
        (None, None)
    } else {
        let (writer, guard) = file_writer(&config.file)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(guard)
}

fn file_writer(
    path: &Path,
) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other(format!("{} has no file name", path.display())))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
