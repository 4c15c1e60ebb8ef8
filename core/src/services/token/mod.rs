//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - Signing access tokens with a random active keyring key
//! - Verifying tokens against active and expiring keys by `kid`
//! - ES512 compact serialization, which `jsonwebtoken` does not provide

mod config;
mod jws;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use jws::{decode_header, JwsHeader};
pub use service::TokenService;
