//! Sub-configuration structs with their defaults.

use crate::types::{HashMethod, HashRequest};
use serde::{Deserialize, Serialize};

/// Default hash parameters used when the caller does not supply them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Grid resolution (the hash has bits x bits cells)
    pub bits: u32,

    /// Hashing strategy: "quick" or "precise"
    pub method: HashMethod,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            bits: 16,
            method: HashMethod::Precise,
        }
    }
}

impl HashingConfig {
    /// The configured parameters as a request.
    pub fn request(&self) -> HashRequest {
        HashRequest::new(self.bits, self.method)
    }
}

/// HTTP settings for remote sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Redirects followed before giving up
    pub max_redirects: usize,

    /// Largest response body accepted, in bytes
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            user_agent: format!("blockprint/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
