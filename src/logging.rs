use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Name of the log file written inside the configured log directory.
pub const LOG_FILE_NAME: &str = "mazetrace.log";

/// Install the global subscriber, writing to `<log_dir>/mazetrace.log`.
///
/// The terminal is in raw mode while the app runs, so nothing is logged to
/// stdout or stderr. The level comes from `RUST_LOG` and defaults to `info`.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_thread_names(true),
    );
    // Only fails if a global subscriber is already set, e.g. when called twice
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Global tracing subscriber already installed");
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_config_rejections_reach_the_log_file() {
        let log_dir = std::env::temp_dir().join(format!("mazetrace-log-{}", std::process::id()));
        let guard = init(&log_dir).unwrap();

        // Same order as startup: subscriber first, then the configuration
        let config = Config::from_lookup(|key| {
            (key == "MAZETRACE_ROWS").then(|| "many".to_string())
        });
        assert_eq!(config.rows, Config::default().rows);

        // Dropping the guard flushes the buffered lines
        drop(guard);
        let written = std::fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
        assert!(written.contains("Ignoring invalid configuration value"));
        assert!(written.contains("MAZETRACE_ROWS"));
        let _ = std::fs::remove_dir_all(&log_dir);
    }
}
