use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Level for the given number of `-v` flags
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolve the log file; a directory gets a timestamped file inside it
fn log_file_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    if path.is_dir() {
        path.join(format!("nbody-bench_{}.log", now.format("%Y%m%d_%H%M%S")))
    } else {
        path.to_path_buf()
    }
}

/// Sets up logging to stderr and optionally to a file.
///
/// `RUST_LOG` overrides the verbosity flags. The returned guard flushes the
/// file writer and must live until the program exits.
pub fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let path = log_file_path(path, Local::now());
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .context("Log file path has no file name")?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test_case(0, "warn")]
    #[test_case(1, "info")]
    #[test_case(2, "debug")]
    #[test_case(7, "trace")]
    fn test_default_directive(verbosity: u8, expected: &str) {
        assert_eq!(default_directive(verbosity), expected);
    }

    #[test]
    fn test_log_file_path() {
        let dir = tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        assert_eq!(
            log_file_path(dir.path(), now),
            dir.path().join("nbody-bench_20240309_140507.log")
        );

        let explicit = dir.path().join("run.log");
        assert_eq!(log_file_path(&explicit, now), explicit);
    }
}
