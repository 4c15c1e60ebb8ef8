//! HTTP layer for the Knockbox authentication service.
//!
//! Exposed as a library so integration tests can mount the same routes
//! the binary serves.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{configure_routes, AppState};
