//! In-memory implementation of UserRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use kb_shared::Page;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};

use super::trait_::UserRepository;

#[derive(Default)]
struct UserTable {
    next_id: u64,
    by_account: HashMap<Uuid, User>,
}

/// Process-local user store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.by_account.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .by_account
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_account_id(&self, account_id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.by_account.get(&account_id).cloned())
    }

    async fn search_by_username(
        &self,
        pattern: &str,
        page: Page,
    ) -> Result<Vec<User>, DomainError> {
        let pattern = pattern.to_lowercase();
        let users = self.users.read().await;

        let mut matches: Vec<&User> = users
            .by_account
            .values()
            .filter(|u| u.username.to_lowercase().contains(&pattern))
            .collect();
        matches.sort_by_key(|u| u.id);

        Ok(matches
            .into_iter()
            .skip(page.offset_usize())
            .take(page.limit_usize())
            .cloned()
            .collect())
    }

    async fn create(&self, mut user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        // Usernames and emails are unique, compared case-insensitively
        let taken = users.by_account.values().any(|u| {
            u.username.eq_ignore_ascii_case(&user.username)
                || u.email.eq_ignore_ascii_case(&user.email)
        });
        if taken || users.by_account.contains_key(&user.account_id) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        users.next_id += 1;
        user.id = users.next_id;
        users.by_account.insert(user.account_id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        let Some(existing) = users.by_account.get(&user.account_id) else {
            return Err(AuthError::UserNotFound.into());
        };
        let id = existing.id;

        let email_taken = users.by_account.values().any(|u| {
            u.account_id != user.account_id && u.email.eq_ignore_ascii_case(&user.email)
        });
        if email_taken {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let user = User { id, ..user };
        users.by_account.insert(user.account_id, user.clone());
        Ok(user)
    }
}
