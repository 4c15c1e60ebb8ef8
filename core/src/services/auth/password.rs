//! bcrypt password hashing

use crate::errors::DomainError;

/// Hashes and checks passwords with bcrypt
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, self.cost).map_err(|e| DomainError::Internal {
            message: format!("password hashing failed: {}", e),
        })
    }

    /// A malformed stored hash counts as a mismatch
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, DomainError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("password hashing task failed: {}", e),
            })?
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> bool {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
