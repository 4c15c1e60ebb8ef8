//! Authentication service module
//!
//! This module provides:
//! - User registration with bcrypt password hashing
//! - Login with token issuance from the signing keyring
//! - Account lookup and self-service updates

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::PasswordHasher;
pub use service::{AuthService, UserChanges, UserRegistration};
