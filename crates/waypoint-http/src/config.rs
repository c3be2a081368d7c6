// waypoint-http/src/config.rs
// ============================================================================
// Module: Server Configuration
// Description: Configuration loading and validation for the HTTP adapter.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file or string. Missing or invalid
//! configuration fails closed; limits are validated before the server binds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum request body size in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Maximum allowed request body limit in bytes.
pub(crate) const MAX_BODY_BYTES_CEILING: usize = 64 * 1024 * 1024;
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// HTTP adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized,
    /// unparseable, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if raw.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file too large".to_string()));
        }
        Self::from_toml_str(&raw)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be positive".to_string()));
        }
        if self.max_body_bytes > MAX_BODY_BYTES_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes exceeds ceiling of {MAX_BODY_BYTES_CEILING}"
            )));
        }
        Ok(())
    }

    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.bind)))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem errors while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse errors.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Validation failures.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
