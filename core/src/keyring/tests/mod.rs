//! Tests for the signing keyring

#[cfg(test)]
mod mocks;
#[cfg(test)]
mod key_tests;
