//! Configuration for the token service

use kb_shared::TokenConfig;

/// Configuration for the token service.
///
/// Token lifetime is not configured here: it is always the keyring's token
/// lifespan, so no token outlives the key that signed it.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Value of the `iss` claim, required on verification
    pub issuer: String,
    /// Value of the `aud` claim, required on verification
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from_settings(&TokenConfig::default())
    }
}

impl TokenServiceConfig {
    pub fn from_settings(token: &TokenConfig) -> Self {
        Self {
            issuer: token.issuer.clone(),
            audience: token.audience.clone(),
        }
    }
}
