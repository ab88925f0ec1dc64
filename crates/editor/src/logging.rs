// Chunk: docs/chunks/logging - tracing subscriber setup
//!
//! Logging setup for the `psedit` binary.
//!
//! ## Environment Variables
//!
//! 1. **`PSEDIT_LOG`** (highest priority)
//! 2. **`RUST_LOG`**
//! 3. **Default**: `warn`
//!
//! Logs go to stderr, so they never mix with rendered output on stdout. With
//! a log file they go to the file instead, through a non-blocking writer
//! whose [`LogGuard`] must be held until exit.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("cannot create log directory {path}: {source}")]
    Dir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub log_file: Option<PathBuf>,
}

/// Installs the global subscriber.
///
/// Safe to call more than once: if a subscriber is already installed the
/// call leaves it in place and still returns a guard.
pub fn init(config: LogConfig) -> Result<LogGuard, LogError> {
    let filter = create_filter()?;

    let Some(path) = config.log_file else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(LogGuard {
            _file_guard: None,
            log_file: None,
        });
    };

    let (dir, filename) = split_log_path(&path);
    std::fs::create_dir_all(&dir).map_err(|source| LogError::Dir {
        path: dir.clone(),
        source,
    })?;
    let appender = tracing_appender::rolling::never(&dir, &filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(LogGuard {
        _file_guard: Some(guard),
        log_file: Some(dir.join(filename)),
    })
}

/// Stderr logging for tests. Ignores an already-installed subscriber.
pub fn test() {
    if let Ok(filter) = create_filter() {
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    }
}

/// `PSEDIT_LOG` > `RUST_LOG` > `warn`.
fn create_filter() -> Result<EnvFilter, LogError> {
    let directives = filter_directives(env::var("PSEDIT_LOG").ok(), env::var("RUST_LOG").ok());
    Ok(EnvFilter::try_new(directives)?)
}

fn filter_directives(psedit_log: Option<String>, rust_log: Option<String>) -> String {
    psedit_log
        .or(rust_log)
        .unwrap_or_else(|| "warn".to_string())
}

fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "psedit.log".to_string());
    (dir, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_priority() {
        assert_eq!(
            filter_directives(Some("debug".into()), Some("info".into())),
            "debug"
        );
        assert_eq!(filter_directives(None, Some("info".into())), "info");
        assert_eq!(filter_directives(None, None), "warn");
    }

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new("/tmp/logs/psedit.log")),
            (PathBuf::from("/tmp/logs"), "psedit.log".to_string())
        );
        assert_eq!(
            split_log_path(Path::new("psedit.log")),
            (PathBuf::from("."), "psedit.log".to_string())
        );
    }

    #[test]
    fn test_init_twice_is_safe() {
        test();
        assert!(init(LogConfig::default()).is_ok());
        assert!(init(LogConfig::default()).is_ok());
    }
}
