//! Unit tests for authentication service

use std::sync::Arc;

use kb_shared::Page;
use uuid::Uuid;

use crate::domain::entities::user::UserRole;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::keyring::{CurveType, KeySet, ManualScheduler};
use crate::repositories::{InMemoryUserRepository, UserRepository};
use crate::services::auth::{AuthService, AuthServiceConfig, UserChanges, UserRegistration};
use crate::services::token::{TokenService, TokenServiceConfig};

const PASSWORD: &str = "correct-horse-battery";

fn service_with_keys(keys: usize) -> (AuthService<InMemoryUserRepository>, Arc<InMemoryUserRepository>) {
    let keyring = KeySet::new(10, 4, Arc::new(ManualScheduler::new())).unwrap();
    keyring.configure([CurveType::P256]).unwrap();
    if keys > 0 {
        keyring.generate(keys).unwrap();
    }

    let repo = Arc::new(InMemoryUserRepository::new());
    let tokens = Arc::new(TokenService::new(keyring, TokenServiceConfig::default()));
    let config = AuthServiceConfig {
        allow_registration: true,
        bcrypt_cost: 4,
    };
    (AuthService::new(repo.clone(), tokens, config), repo)
}

fn registration(username: &str) -> UserRegistration {
    UserRegistration {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        email: format!("{}@example.com", username),
    }
}

#[tokio::test]
async fn test_register_stores_hashed_password() {
    let (service, repo) = service_with_keys(1);

    let user = service.register(registration("alice")).await.unwrap();
    assert_eq!(user.role, UserRole::User);
    assert_ne!(user.password_hash, PASSWORD);

    let stored = repo.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(stored.account_id, user.account_id);
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let (service, _) = service_with_keys(1);
    service.register(registration("alice")).await.unwrap();

    let result = service.register(registration("alice")).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
}

#[tokio::test]
async fn test_register_validates_fields() {
    let (service, _) = service_with_keys(1);

    let mut short_password = registration("alice");
    short_password.password = "short".to_string();
    assert!(matches!(
        service.register(short_password).await,
        Err(DomainError::Validation { .. })
    ));

    assert!(matches!(
        service.register(registration("a")).await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_register_disabled() {
    let keyring = KeySet::new(10, 4, Arc::new(ManualScheduler::new())).unwrap();
    let tokens = Arc::new(TokenService::new(keyring, TokenServiceConfig::default()));
    let config = AuthServiceConfig {
        allow_registration: false,
        bcrypt_cost: 4,
    };
    let service = AuthService::new(Arc::new(InMemoryUserRepository::new()), tokens, config);

    assert!(matches!(
        service.register(registration("alice")).await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let (service, _) = service_with_keys(2);
    let user = service.register(registration("alice")).await.unwrap();

    let issued = service.login("alice", PASSWORD).await.unwrap();
    assert_eq!(issued.token_type, "Bearer");
    assert_eq!(issued.expires_in, 86_400);

    let claims = service.token_service().verify(&issued.access_token).unwrap();
    assert_eq!(claims.account_id, user.account_id);
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (service, _) = service_with_keys(1);
    service.register(registration("alice")).await.unwrap();

    assert!(matches!(
        service.login("alice", "wrong-password-123").await,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        service.login("nobody", PASSWORD).await,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_login_without_signing_key() {
    let (service, _) = service_with_keys(0);
    service.register(registration("alice")).await.unwrap();

    assert!(matches!(
        service.login("alice", PASSWORD).await,
        Err(DomainError::Token(TokenError::NoSigningKey))
    ));
}

#[tokio::test]
async fn test_current_user() {
    let (service, _) = service_with_keys(1);
    let user = service.register(registration("alice")).await.unwrap();

    assert_eq!(service.current_user(user.account_id).await.unwrap(), user);
    assert!(matches!(
        service.current_user(Uuid::new_v4()).await,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
}

#[tokio::test]
async fn test_update_email_and_password() {
    let (service, _) = service_with_keys(1);
    let user = service.register(registration("alice")).await.unwrap();

    let changes = UserChanges {
        email: Some("new@example.com".to_string()),
        password: Some("another-long-password".to_string()),
    };
    let updated = service.update(user.account_id, changes).await.unwrap();
    assert_eq!(updated.email, "new@example.com");

    assert!(service.login("alice", "another-long-password").await.is_ok());
    assert!(service.login("alice", PASSWORD).await.is_err());
}

#[tokio::test]
async fn test_update_requires_changes() {
    let (service, _) = service_with_keys(1);
    let user = service.register(registration("alice")).await.unwrap();

    assert!(matches!(
        service.update(user.account_id, UserChanges::default()).await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_search_trims_and_pages() {
    let (service, _) = service_with_keys(1);
    for name in ["alice", "alicia", "bob"] {
        service.register(registration(name)).await.unwrap();
    }

    let found = service.search("  ali ", Page::default()).await.unwrap();
    assert_eq!(found.len(), 2);

    // Zero limit falls back to the default page size
    let found = service.search("ali", Page { limit: 0, offset: 1 }).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "alicia");

    assert!(matches!(
        service.search("   ", Page::default()).await,
        Err(DomainError::Validation { .. })
    ));
}
