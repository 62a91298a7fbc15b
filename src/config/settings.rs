//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::packaging::DEFAULT_ACCEPTANCE_THRESHOLD;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Path to the package database table.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Text encoding label of the package database (e.g. "utf-8", "latin1").
    #[serde(default = "default_database_encoding")]
    pub database_encoding: String,

    /// Package label matching settings.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.matching.acceptance_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid acceptance threshold {threshold}. Must be between 0 and 1"
                ),
            });
        }

        if encoding_rs::Encoding::for_label(self.database_encoding.trim().as_bytes()).is_none() {
            return Err(ConfigError::ValidationError {
                message: format!("Unknown database encoding '{}'", self.database_encoding),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            database_path: None,
            database_encoding: default_database_encoding(),
            matching: MatchingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_database_encoding() -> String {
    "utf-8".to_string()
}

/// Package label matching configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Minimum match score to accept a database alias.
    /// Default: 0.75
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: default_acceptance_threshold(),
        }
    }
}

const fn default_acceptance_threshold() -> f64 {
    DEFAULT_ACCEPTANCE_THRESHOLD
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
