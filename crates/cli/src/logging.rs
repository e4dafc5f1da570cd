use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::LogLevel;

const LOG_NAME: &str = "triage";

/// Install the global subscriber.
///
/// With a log directory, output goes to a new per-run file there and its path
/// is returned; otherwise it goes to stderr. `RUST_LOG` takes precedence over
/// `level`.
pub fn init(level: LogLevel, directory: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let registry = tracing_subscriber::registry().with(filter);

    match directory {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;
            let path = next_log_path(dir, &Local::now().format("%Y-%m-%d").to_string());
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;

            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .init();
            Ok(Some(path))
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
    }
}

/// First unused `<date>-triage_<n>.log` path in `dir`, counting from 1.
pub fn next_log_path(dir: &Path, date: &str) -> PathBuf {
    (1u32..)
        .map(|n| dir.join(format!("{}-{}_{}.log", date, LOG_NAME, n)))
        .find(|path| !path.exists())
        .unwrap_or_else(|| dir.join(format!("{}-{}.log", date, LOG_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_log_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = next_log_path(dir.path(), "2024-05-01");
        assert_eq!(path, dir.path().join("2024-05-01-triage_1.log"));
    }

    #[test]
    fn test_log_path_skips_existing_runs() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("2024-05-01-triage_1.log")).unwrap();
        File::create(dir.path().join("2024-05-01-triage_2.log")).unwrap();
        File::create(dir.path().join("2024-04-30-triage_3.log")).unwrap();

        let path = next_log_path(dir.path(), "2024-05-01");
        assert_eq!(path, dir.path().join("2024-05-01-triage_3.log"));
    }
}
