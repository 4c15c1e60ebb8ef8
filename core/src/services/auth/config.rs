//! Configuration for the authentication service

use kb_shared::TokenConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether to allow registration of new users
    pub allow_registration: bool,
    /// bcrypt cost factor for new password hashes
    pub bcrypt_cost: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthServiceConfig {
    pub fn from_settings(token: &TokenConfig) -> Self {
        Self {
            bcrypt_cost: token.bcrypt_cost,
            ..Self::default()
        }
    }
}
