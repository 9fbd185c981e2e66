//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `warn`: ignored input (default)
//! - `info`: analysis results, shadowed reference records
//! - `debug`: individual resolution steps
//! - `trace`: everything else
//!
//! `RUST_LOG` overrides the level chosen on the command line.
//!
//! The interactive interface owns the terminal, so it logs to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::{Level, Subscriber};
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

/// Configuration for logging behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is not set.
    pub level: Level,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
    /// Log file; stderr when `None`.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_ansi: true,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Creates a config from the number of `-v` flags.
    ///
    /// - 0: warn
    /// - 1 (`-v`): info
    /// - 2 (`-vv`): debug
    /// - 3+ (`-vvv`): trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set the log file path (writes to stderr when `None`).
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Returns a fresh log file path in `dir`, e.g. `nat2dose-1a2b3c4d.log`.
pub fn random_log_path(dir: &Path) -> PathBuf {
    let suffix: u32 = rand::random();
    dir.join(format!("nat2dose-{:08x}.log", suffix))
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            init_logging_with_writer(config.level, false, Mutex::new(file))
        }
        None => init_logging_with_writer(config.level, config.with_ansi, io::stderr),
    }
}

/// Installs the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(level: Level, with_ansi: bool, writer: W) -> io::Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let subscriber = build_subscriber(build_env_filter(level), with_ansi, writer);
    tracing::subscriber::set_global_default(subscriber).map_err(|e| io::Error::other(e.to_string()))
}

fn build_subscriber<W>(filter: EnvFilter, with_ansi: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(with_ansi)
        .with_target(false)
        .without_time()
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(7).level, Level::TRACE);
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::from_verbosity(1)
            .with_log_file(Some(PathBuf::from("run.log")))
            .with_ansi(false);
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
        assert!(!config.with_ansi);
    }

    #[test]
    fn test_random_log_path() {
        let dir = Path::new("/tmp");
        let path = random_log_path(dir);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("nat2dose-"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "nat2dose-".len() + 8 + ".log".len());
        assert_eq!(path.parent(), Some(dir));
    }

    #[test]
    fn test_file_writer_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        let file = OpenOptions::new().create(true).append(true).open(&path).unwrap();
        let subscriber = build_subscriber(EnvFilter::new("info"), false, Mutex::new(file));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("analysis complete");
            tracing::debug!("filtered out");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("analysis complete"));
        assert!(!content.contains("filtered out"));
    }
}
