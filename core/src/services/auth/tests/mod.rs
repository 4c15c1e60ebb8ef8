//! Tests for authentication service

#[cfg(test)]
mod password_tests;
#[cfg(test)]
mod service_tests;
