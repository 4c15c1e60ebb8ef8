//! Type definitions shared between the core and API crates
//!
//! - `pagination` - Limit/offset paging for list endpoints
//! - `response` - Health check responses

pub mod pagination;
pub mod response;

pub use pagination::Page;
pub use response::{HealthResponse, HealthStatus};
