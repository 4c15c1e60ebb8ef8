//! Configuration module with service-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token claims and password hashing configuration
//! - `environment` - Environment detection and logging configuration
//! - `keyring` - Signing key lifespans and curve pool
//! - `server` - HTTP server configuration
//!
//! Every sub-configuration has a `Default` and a `from_env()` constructor.
//! Malformed values are reported as [`ConfigError`] rather than silently
//! replaced, since a misconfigured keyring must stop the process at startup.

pub mod auth;
pub mod environment;
pub mod keyring;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// Re-export commonly used types
pub use auth::TokenConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use keyring::KeyringConfig;
pub use server::ServerConfig;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Signing keyring configuration
    pub keyring: KeyringConfig,

    /// Token claims and password hashing configuration
    #[serde(default)]
    pub token: TokenConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            keyring: KeyringConfig::default(),
            token: TokenConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env()?;
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging.level = level;
        }

        let config = Self {
            environment,
            server: ServerConfig::from_env()?,
            keyring: KeyringConfig::from_env()?,
            token: TokenConfig::from_env()?,
            logging,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.keyring.validate()?;
        self.token.validate()
    }
}

/// Read an environment variable, falling back to `default` when it is unset.
///
/// A variable that is set but does not parse is an error.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
