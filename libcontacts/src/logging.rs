//! Logging setup shared by the contact manager binaries
//!
//! Supports text, JSON and pretty output, written either to stderr or to a
//! log file. The terminal UI owns the screen, so it logs to a file.
//!
//! # Examples
//!
//! ```no_run
//! use libcontacts::logging::{LoggingConfig, LogFormat, LogTarget};
//!
//! let config = LoggingConfig::new(LogFormat::Json, "info".to_string(), false)
//!     .with_target(LogTarget::File("/tmp/contacts.log".into()));
//! config.init().unwrap();
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output (no colors, for piping)
    Text,
    /// Machine-parseable JSON (one JSON object per line)
    Json,
    /// Pretty-printed with colors (for development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; parent directories are created
    File(PathBuf),
}

/// Configuration for logging initialization
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
    pub target: LogTarget,
}

impl LoggingConfig {
    /// Create a new logging configuration writing to stderr
    ///
    /// # Arguments
    ///
    /// * `format` - Log output format (text, json, or pretty)
    /// * `level` - Minimum log level (error, warn, info, debug, trace)
    /// * `verbose` - If true, defaults to debug level
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
            target: LogTarget::Stderr,
        }
    }

    pub fn with_target(self, target: LogTarget) -> Self {
        Self { target, ..self }
    }

    fn filter(&self) -> EnvFilter {
        let fallback = if self.verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }

    /// Initialize logging with the configured settings
    ///
    /// Call once at program start. Fails if the log file cannot be opened;
    /// a subscriber that is already installed is left in place.
    pub fn init(&self) -> std::io::Result<()> {
        match &self.target {
            LogTarget::Stderr => {
                self.install(std::io::stderr, true);
            }
            LogTarget::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                self.install(Mutex::new(file), false);
            }
        }
        Ok(())
    }

    fn install<W>(&self, writer: W, ansi: bool)
    where
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = self.filter();

        // try_init: a second initialisation (tests, embedding) is not fatal
        let _ = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_current_span(true)
                .with_span_list(true)
                .flatten_event(true)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_level(true)
                .try_init(),
        };
    }
}

/// Build a logging configuration from the environment
///
/// Respects `CONTACTS_LOG_FORMAT` and `CONTACTS_LOG_LEVEL`, falling back to
/// text format at info level.
pub fn config_from_env() -> LoggingConfig {
    let format = std::env::var("CONTACTS_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);

    let level = std::env::var("CONTACTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    LoggingConfig::new(format, level, false)
}
