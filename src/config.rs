//! Configuration file
//!
//! A JSON object; every key is optional:
//!
//! ```json
//! {
//!   "store_dir": "./registry",
//!   "storage_key": "equestrianRegistry",
//!   "minimum_age": 18,
//!   "min_text_length": 2,
//!   "trim_before_length_check": false,
//!   "validation_mode": "onChange",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::{ValidationMode, DEFAULT_STORAGE_KEY};
use crate::observability::Severity;
use crate::schema::SchemaOptions;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Form configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Directory holding the registry file
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Key the submitted record is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Minimum age in calendar years
    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,

    /// Minimum length of names and city
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Trim whitespace before the length check
    #[serde(default)]
    pub trim_before_length_check: bool,

    #[serde(default)]
    pub validation_mode: ValidationMode,

    /// Lowest log severity written: trace, info, warn, error, fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_dir() -> String {
    "./registry".to_string()
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_minimum_age() -> u32 {
    18
}
fn default_min_text_length() -> usize {
    2
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            storage_key: default_storage_key(),
            minimum_age: default_minimum_age(),
            min_text_length: default_min_text_length(),
            trim_before_length_check: false,
            validation_mode: ValidationMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl FormConfig {
    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: FormConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::invalid("storage_key", "must not be empty"));
        }

        if self.store_dir.trim().is_empty() {
            return Err(ConfigError::invalid("store_dir", "must not be empty"));
        }

        if !(1..=150).contains(&self.minimum_age) {
            return Err(ConfigError::invalid(
                "minimum_age",
                format!("{} is outside 1..=150", self.minimum_age),
            ));
        }

        if self.min_text_length == 0 {
            return Err(ConfigError::invalid("min_text_length", "must be > 0"));
        }

        self.log_severity()?;
        Ok(())
    }

    /// Rule options derived from this configuration
    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            min_text_length: self.min_text_length,
            minimum_age: self.minimum_age,
            trim_before_length_check: self.trim_before_length_check,
        }
    }

    pub fn store_path(&self) -> &Path {
        Path::new(&self.store_dir)
    }

    pub fn log_severity(&self) -> ConfigResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|reason: String| ConfigError::invalid("log_level", reason))
    }
}
