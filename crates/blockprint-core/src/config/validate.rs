//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::pipeline::hash::{GRID_STEP, MAX_GRID_BITS};

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.hashing.bits == 0 {
            return Err(ConfigError::ValidationError(
                "hashing.bits must be > 0".into(),
            ));
        }
        if self.hashing.bits > MAX_GRID_BITS {
            return Err(ConfigError::ValidationError(format!(
                "hashing.bits must be <= {MAX_GRID_BITS}"
            )));
        }
        if self.hashing.bits % GRID_STEP != 0 {
            return Err(ConfigError::ValidationError(format!(
                "hashing.bits must be a multiple of {GRID_STEP}"
            )));
        }
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.timeout_ms must be > 0".into(),
            ));
        }
        if self.fetch.max_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.max_bytes must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got \"{}\"",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}
