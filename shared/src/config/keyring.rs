//! Signing keyring configuration

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// Configuration for the in-memory signing keyring
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyringConfig {
    /// Total time a key stays available for verification, in seconds
    pub key_lifespan_seconds: u64,

    /// Lifetime of an issued token, in seconds
    pub jwt_lifespan_seconds: u64,

    /// Curve names the keyring draws from (e.g. "P-256", "P-384", "P-521")
    #[serde(default = "default_curves")]
    pub curves: Vec<String>,

    /// Number of keys generated at startup
    #[serde(default = "default_initial_keys")]
    pub initial_keys: usize,
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            key_lifespan_seconds: 129_600, // 36 hours
            jwt_lifespan_seconds: 86_400,  // 24 hours
            curves: default_curves(),
            initial_keys: default_initial_keys(),
        }
    }
}

impl KeyringConfig {
    /// Create a keyring configuration with the given lifespans
    pub fn new(key_lifespan_seconds: u64, jwt_lifespan_seconds: u64) -> Self {
        Self {
            key_lifespan_seconds,
            jwt_lifespan_seconds,
            ..Default::default()
        }
    }

    /// Set the curve pool
    pub fn with_curves<I, S>(mut self, curves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.curves = curves.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of keys generated at startup
    pub fn with_initial_keys(mut self, initial_keys: usize) -> Self {
        self.initial_keys = initial_keys;
        self
    }

    /// Create from environment variables
    ///
    /// - `KEY_LIFESPAN_SECONDS` (default 129600)
    /// - `JWT_LIFESPAN_SECONDS` (default 86400)
    /// - `KEYRING_CURVES` comma separated (default "P-521")
    /// - `KEYRING_INITIAL_KEYS` (default 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let curves = match std::env::var("KEYRING_CURVES") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|curve| !curve.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => defaults.curves,
        };

        Ok(Self {
            key_lifespan_seconds: env_or("KEY_LIFESPAN_SECONDS", defaults.key_lifespan_seconds)?,
            jwt_lifespan_seconds: env_or("JWT_LIFESPAN_SECONDS", defaults.jwt_lifespan_seconds)?,
            curves,
            initial_keys: env_or("KEYRING_INITIAL_KEYS", defaults.initial_keys)?,
        })
    }

    /// Check the lifespan relationship and pool settings.
    ///
    /// A key must outlive every token it signed, so the key lifespan may
    /// never be shorter than the token lifespan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_lifespan_seconds == 0 || self.jwt_lifespan_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "key and jwt lifespans must be positive".to_string(),
            });
        }
        if self.key_lifespan_seconds < self.jwt_lifespan_seconds {
            return Err(ConfigError::Invalid {
                message: format!(
                    "key lifespan ({}s) is shorter than jwt lifespan ({}s)",
                    self.key_lifespan_seconds, self.jwt_lifespan_seconds
                ),
            });
        }
        if self.curves.is_empty() {
            return Err(ConfigError::Invalid {
                message: "at least one curve must be configured".to_string(),
            });
        }
        if self.initial_keys == 0 {
            return Err(ConfigError::Invalid {
                message: "initial key count must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn default_curves() -> Vec<String> {
    vec![String::from("P-521")]
}

fn default_initial_keys() -> usize {
    3
}
