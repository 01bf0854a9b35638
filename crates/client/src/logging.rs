//! Logging to stderr and to a per-session file.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform log directory, e.g. `~/.cache/holding-bag/logs` on Linux.
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "holding-bag")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("holding-bag"))
        .join("logs")
}

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG` on top of an INFO default. The returned guard
/// flushes the file writer when dropped, so keep it alive until exit.
pub fn setup_logging() -> Result<WorkerGuard> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let session_log_dir = log_dir().join(format!("session_{timestamp}"));
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Log file: {}/client.log", session_log_dir.display());
    Ok(guard)
}
