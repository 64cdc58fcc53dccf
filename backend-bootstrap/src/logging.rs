use std::path::Path;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::{EnvFilter, Registry};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Stdout always; the file layer only when `log_file` is set.
pub fn init(log_file: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = build_file_writer(Path::new(path))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;

    if let Some(guard) = guard {
        FILE_GUARD
            .set(guard)
            .map_err(|_| anyhow!("log file writer already installed"))?;
    }
    Ok(())
}

fn build_file_writer(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log_file has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
