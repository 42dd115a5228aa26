//! Logging configuration
//!
//! Controls the internal logging behavior of reel, and installs the global
//! `tracing` subscriber from it.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use serde::Deserialize;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, Result};

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level - every wrap step
    Trace,
    /// Debug level - every resolved component
    Debug,
    /// Info level - assembled flows (default)
    #[default]
    Info,
    /// Warn level - teardown failures
    Warn,
    /// Error level - errors only
    Error,
}

impl LogLevel {
    /// Convert to tracing level filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output (default)
    #[default]
    Console,
    /// JSON structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Write to stdout (default)
    #[default]
    Stdout,
    /// Write to stderr
    Stderr,
    /// Append to a file
    #[serde(untagged)]
    File(String),
}

/// Logging configuration
///
/// # Example
///
/// ```toml
/// [log]
/// level = "info"
/// format = "console"
/// output = "stdout"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: info
    pub level: LogLevel,

    /// Output format (console, json)
    /// Default: console
    pub format: LogFormat,

    /// Output destination (stdout, stderr, or file path)
    /// Default: stdout
    pub output: LogOutput,
}

impl LogConfig {
    fn make_writer(&self) -> Result<BoxMakeWriter> {
        Ok(match &self.output {
            LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
            LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
            LogOutput::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| ConfigError::IoError {
                        path: path.clone(),
                        source: e,
                    })?;
                BoxMakeWriter::new(Mutex::new(file))
            }
        })
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.as_str()))
        .map_err(|e| ConfigError::logging_init(format!("invalid log level: {e}")))?;
    let writer = config.make_writer()?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| ConfigError::logging_init(e.to_string()))
}
