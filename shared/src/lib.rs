//! Shared utilities and common types for the Knockbox authentication server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (keyring lifespans, token claims, HTTP server, logging)
//! - Error response structures
//! - Validation helpers for user-supplied fields
//! - Health response and paging types

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, Environment, KeyringConfig, LogFormat, LoggingConfig, ServerConfig,
    TokenConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{HealthResponse, HealthStatus, Page};
pub use utils::validation;
