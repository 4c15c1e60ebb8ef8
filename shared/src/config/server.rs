//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Seconds granted to in-flight requests on shutdown
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,

    /// Origins accepted by CORS outside development
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 9090,
            workers: 0, // Use all CPU cores
            shutdown_timeout: default_shutdown_timeout(),
            allowed_origins: Vec::new(),
            cors_max_age: default_cors_max_age(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables (`SERVER_HOST`, `SERVER_PORT`, `SERVER_WORKERS`,
    /// `SERVER_SHUTDOWN_TIMEOUT`, `ALLOWED_ORIGINS`, `CORS_MAX_AGE`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.allowed_origins);

        Ok(Self {
            host: std::env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: env_or("SERVER_PORT", defaults.port)?,
            workers: env_or("SERVER_WORKERS", defaults.workers)?,
            shutdown_timeout: env_or("SERVER_SHUTDOWN_TIMEOUT", defaults.shutdown_timeout)?,
            allowed_origins,
            cors_max_age: env_or("CORS_MAX_AGE", defaults.cors_max_age)?,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_cors_max_age() -> usize {
    3600
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
