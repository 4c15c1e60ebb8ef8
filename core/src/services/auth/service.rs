//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use kb_shared::validation::validators;
use kb_shared::Page;

use crate::domain::entities::token::IssuedToken;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::password::PasswordHasher;

/// Fields supplied when registering a new account
#[derive(Debug, Clone)]
pub struct UserRegistration {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Self-service account changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Authentication service for registration, login and account lookup
pub struct AuthService<U: UserRepository> {
    /// User repository for persistence
    user_repository: Arc<U>,
    /// Token service for signing access tokens
    token_service: Arc<TokenService>,
    hasher: PasswordHasher,
    config: AuthServiceConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            hasher: PasswordHasher::new(config.bcrypt_cost),
            config,
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }

    /// Register a new user with the default role
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Validation)` - A field breaks the account rules
    /// * `Err(AuthError::UserAlreadyExists)` - Username or email is taken
    pub async fn register(&self, registration: UserRegistration) -> DomainResult<User> {
        if !self.config.allow_registration {
            return Err(DomainError::Validation {
                message: "registration is disabled".to_string(),
            });
        }

        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();
        if !validators::is_valid_username(&username) {
            return Err(DomainError::Validation {
                message: "username must be 2-16 characters of letters, digits, '_', '.' or '-'"
                    .to_string(),
            });
        }
        if !validators::is_valid_password(&registration.password) {
            return Err(DomainError::Validation {
                message: "password must be 12-32 characters".to_string(),
            });
        }
        if !validators::not_empty(&email) {
            return Err(DomainError::Validation {
                message: "email is required".to_string(),
            });
        }

        if self.user_repository.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self.hasher.hash_blocking(registration.password).await?;
        let user = self
            .user_repository
            .create(User::new(username, email, password_hash))
            .await?;

        info!("Registered user {} ({})", user.username, user.account_id);
        Ok(user)
    }

    /// Check credentials and issue an access token
    ///
    /// Unknown usernames and wrong passwords both yield
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<IssuedToken> {
        let Some(user) = self.user_repository.find_by_username(username.trim()).await? else {
            debug!("Login for unknown username {}", username);
            return Err(AuthError::InvalidCredentials.into());
        };

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await;
        if !matches {
            debug!("Login with wrong password for {}", user.username);
            return Err(AuthError::InvalidCredentials.into());
        }

        self.token_service.issue(&user)
    }

    pub async fn find_by_account_id(&self, account_id: Uuid) -> DomainResult<Option<User>> {
        self.user_repository.find_by_account_id(account_id).await
    }

    pub async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        self.user_repository.find_by_username(username.trim()).await
    }

    /// Users whose username contains `username`, one page at a time
    pub async fn search(&self, username: &str, page: Page) -> DomainResult<Vec<User>> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation {
                message: "username must not be blank".to_string(),
            });
        }
        self.user_repository
            .search_by_username(username, page.normalized())
            .await
    }

    /// The account a verified token belongs to
    pub async fn current_user(&self, account_id: Uuid) -> DomainResult<User> {
        self.find_by_account_id(account_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Apply email or password changes to an account
    pub async fn update(&self, account_id: Uuid, changes: UserChanges) -> DomainResult<User> {
        if changes.is_empty() {
            return Err(DomainError::Validation {
                message: "no changes supplied".to_string(),
            });
        }

        let mut user = self.current_user(account_id).await?;

        if let Some(email) = changes.email {
            let email = email.trim().to_string();
            if !validators::not_empty(&email) {
                return Err(DomainError::Validation {
                    message: "email must not be empty".to_string(),
                });
            }
            user.email = email;
        }

        if let Some(password) = changes.password {
            if !validators::is_valid_password(&password) {
                return Err(DomainError::Validation {
                    message: "password must be 12-32 characters".to_string(),
                });
            }
            user.password_hash = self.hasher.hash_blocking(password).await?;
        }

        let user = self.user_repository.update(user).await?;
        info!("Updated account {}", user.account_id);
        Ok(user)
    }
}
