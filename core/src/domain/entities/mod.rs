//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{Claims, IssuedToken};
pub use user::{User, UserDto, UserRole};
