//! Token claims and password hashing configuration

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// Claims stamped on every issued token, plus password hashing cost
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// bcrypt cost factor used when hashing passwords
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: String::from("knockbox-auth"),
            audience: String::from("knockbox"),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl TokenConfig {
    /// Create from environment variables (`JWT_ISSUER`, `JWT_AUDIENCE`, `BCRYPT_COST`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }

    /// bcrypt accepts costs between 4 and 31
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST".to_string(),
                value: self.bcrypt_cost.to_string(),
            });
        }
        if self.issuer.trim().is_empty() || self.audience.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "issuer and audience must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn default_bcrypt_cost() -> u32 {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_config_default() {
        let config = TokenConfig::default();
        assert_eq!(config.issuer, "knockbox-auth");
        assert_eq!(config.bcrypt_cost, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut config = TokenConfig::default();
        config.bcrypt_cost = 3;
        assert!(config.validate().is_err());
        config.bcrypt_cost = 4;
        assert!(config.validate().is_ok());
    }
}
