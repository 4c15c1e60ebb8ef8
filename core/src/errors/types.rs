//! Specific error types for the keyring, token and authentication layers

use thiserror::Error;

/// Errors raised by the signing keyring
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyringError {
    /// Invalid lifespans, empty or unknown curve pool, non-positive counts.
    /// Fatal at startup.
    #[error("Keyring configuration error: {message}")]
    Configuration { message: String },

    /// Key material could not be produced or serialized
    #[error("Key generation failed: {message}")]
    Generation { message: String },
}

impl KeyringError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Whether this error must abort startup
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("No active signing key available")]
    NoSigningKey,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token signed by an unknown key")]
    UnknownKey,

    #[error("Invalid token claims")]
    InvalidClaims,
}

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("A user with the provided username or email already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Account role '{role}' is not permitted to access this resource")]
    ForbiddenRole { role: String },
}
