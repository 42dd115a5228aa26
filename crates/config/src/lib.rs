//! Reel Configuration
//!
//! TOML-based configuration loading with sensible defaults. Every section
//! is optional.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use reel_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[flows.capture]\ninput = \"tcp|http\"\noutputs = [\"json|stdout\"]").unwrap();
//! assert_eq!(config.flow_names(), vec!["capture"]);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "debug"
//! format = "json"
//!
//! [flows.capture]
//! input = "tcp|http"
//! outputs = ["json|gzip|gcs", "har|stdout"]
//! ```

mod error;
mod flows;
pub mod logging;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use error::{ConfigError, Result};
pub use flows::FlowConfig;
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Named flows, ordered by name
    pub flows: BTreeMap<String, FlowConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or
    /// declares an incomplete flow.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, flow) in &self.flows {
            flow.validate(name)?;
        }
        Ok(())
    }

    /// Look up a flow by name
    pub fn flow(&self, name: &str) -> Option<&FlowConfig> {
        self.flows.get(name)
    }

    /// Flow names in sorted order
    pub fn flow_names(&self) -> Vec<&str> {
        self.flows.keys().map(String::as_str).collect()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
