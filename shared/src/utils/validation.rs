//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Usernames are limited to ASCII letters, digits, `_`, `.` and `-`
pub static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("username pattern is a valid regex")
});

/// Minimum and maximum username length
pub const USERNAME_LENGTH: (usize, usize) = (2, 16);

/// Minimum and maximum password length
pub const PASSWORD_LENGTH: (usize, usize) = (12, 32);

/// Common validation functions
pub mod validators {
    use super::{PASSWORD_LENGTH, USERNAME_LENGTH, USERNAME_REGEX};

    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length (in characters) is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        len >= min && len <= max
    }

    /// Check if a username is well formed
    pub fn is_valid_username(username: &str) -> bool {
        length_between(username, USERNAME_LENGTH.0, USERNAME_LENGTH.1)
            && USERNAME_REGEX.is_match(username)
    }

    /// Check if a password satisfies the length policy
    pub fn is_valid_password(password: &str) -> bool {
        length_between(password, PASSWORD_LENGTH.0, PASSWORD_LENGTH.1)
    }
}
