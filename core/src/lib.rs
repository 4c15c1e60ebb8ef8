//! # Knockbox Core
//!
//! Core domain layer for the Knockbox authentication service.
//! This crate contains the rotating signing keyring, token issuance and
//! verification, user entities, repository interfaces and error types.

pub mod domain;
pub mod errors;
pub mod keyring;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use keyring::{CurveType, JwkSet, KeyRecord, KeySet, KeyringStats, PublicJwk};
pub use repositories::*;
pub use services::*;
