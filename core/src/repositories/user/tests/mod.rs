//! Unit tests for the in-memory user repository

#[cfg(test)]
mod memory_tests;
