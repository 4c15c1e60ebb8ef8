//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, KeyringError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Keyring(#[from] KeyringError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type DomainResult<T> = Result<T, DomainError>;
