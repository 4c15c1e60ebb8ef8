//! User repository trait defining the interface for user data persistence.
//!
//! The trait is async-first so a database-backed store can be dropped in
//! without touching the services that depend on it.

use async_trait::async_trait;
use kb_shared::Page;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact username
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that username
    /// * `Err(DomainError)` - Storage error
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their public account id
    async fn find_by_account_id(&self, account_id: Uuid) -> Result<Option<User>, DomainError>;

    /// Users whose username contains `pattern`, ignoring case.
    ///
    /// Results are ordered by creation and windowed by `page`.
    async fn search_by_username(&self, pattern: &str, page: Page)
        -> Result<Vec<User>, DomainError>;

    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user with its assigned `id`
    /// * `Err(AuthError::UserAlreadyExists)` - Username or email is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Replace an existing user, matched by account id
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(AuthError::UserNotFound)` - No such account
    /// * `Err(AuthError::UserAlreadyExists)` - The new email belongs to another account
    async fn update(&self, user: User) -> Result<User, DomainError>;
}
