//! Run configuration for a merge.
//!
//! A run is described by a TOML file: an ordered list of `[[source]]`
//! endpoints, one `[destination]`, and the two batch-sizing knobs. Source
//! order is significant - it decides which copy of a colliding key wins.
//!
//! ```toml
//! scan_count = 10000
//! flush_threshold = 100000
//!
//! [destination]
//! host = "10.200.16.67"
//! port = 6390
//!
//! [[source]]
//! name = "redis_session"
//! host = "10.200.16.75"
//!
//! [[source]]
//! name = "redis_cache"
//! host = "10.200.16.67"
//! password = "hunter2"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default SCAN count hint per batch.
pub const DEFAULT_SCAN_COUNT: u32 = 10_000;
/// Default number of processed entries between pipeline flushes.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 100_000;

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One store endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    /// Label used in progress reporting. Defaults to `host:port`.
    #[serde(default)]
    pub name: Option<String>,
    /// Hostname or IP.
    pub host: String,
    /// Port, defaulting to 6379.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Password for authentication.
    #[serde(default)]
    pub password: Option<String>,
}

impl Endpoint {
    /// The reporting label for this endpoint.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.host, self.port))
    }
}

fn default_port() -> u16 {
    6379
}

fn default_scan_count() -> u32 {
    DEFAULT_SCAN_COUNT
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

/// Full configuration of one merge run.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    /// Source instances, merged in this order. First writer wins for keys
    /// that collide across sources.
    #[serde(default, rename = "source")]
    pub sources: Vec<Endpoint>,
    /// The destination everything is merged into.
    pub destination: Endpoint,
    /// SCAN count hint per batch.
    #[serde(default = "default_scan_count")]
    pub scan_count: u32,
    /// Number of processed entries between pipeline flushes.
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
}

impl MergeConfig {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: MergeConfig = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one [[source]] is required".to_string(),
            ));
        }
        if self.scan_count == 0 {
            return Err(ConfigError::Invalid(
                "scan_count must be greater than zero".to_string(),
            ));
        }
        if self.flush_threshold == 0 {
            return Err(ConfigError::Invalid(
                "flush_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
