//! Route handlers grouped by area

pub mod auth;
pub mod health;
pub mod jwks;
pub mod user;
