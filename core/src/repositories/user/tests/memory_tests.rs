//! Unit tests for in-memory user repository

use kb_shared::Page;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::{InMemoryUserRepository, UserRepository};

fn user(username: &str, email: &str) -> User {
    User::new(username.to_string(), email.to_string(), "hash".to_string())
}

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemoryUserRepository::new();

    let created = repo.create(user("alice", "alice@example.com")).await.unwrap();
    assert_eq!(created.id, 1);

    let by_name = repo.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name.account_id, created.account_id);

    let by_account = repo.find_by_account_id(created.account_id).await.unwrap();
    assert_eq!(by_account, Some(created));

    assert!(repo.find_by_username("bob").await.unwrap().is_none());
    assert!(repo.find_by_account_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_ids_are_sequential() {
    let repo = InMemoryUserRepository::new();
    let a = repo.create(user("alice", "a@example.com")).await.unwrap();
    let b = repo.create(user("bob", "b@example.com")).await.unwrap();
    assert_eq!((a.id, b.id), (1, 2));
    assert_eq!(repo.len().await, 2);
}

#[tokio::test]
async fn test_duplicate_username_or_email() {
    let repo = InMemoryUserRepository::new();
    repo.create(user("alice", "alice@example.com")).await.unwrap();

    let same_name = repo.create(user("Alice", "other@example.com")).await;
    assert!(matches!(
        same_name,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));

    let same_email = repo.create(user("alice2", "ALICE@example.com")).await;
    assert!(matches!(
        same_email,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_update() {
    let repo = InMemoryUserRepository::new();
    let mut alice = repo.create(user("alice", "alice@example.com")).await.unwrap();
    repo.create(user("bob", "bob@example.com")).await.unwrap();

    alice.email = "new@example.com".to_string();
    alice.role = UserRole::Admin;
    let updated = repo.update(alice.clone()).await.unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.email, "new@example.com");

    alice.email = "bob@example.com".to_string();
    assert!(matches!(
        repo.update(alice).await,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));

    assert!(matches!(
        repo.update(user("ghost", "ghost@example.com")).await,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
}

#[tokio::test]
async fn test_search_by_username_matches_substrings_in_creation_order() {
    let repo = InMemoryUserRepository::new();
    for name in ["alice", "bob", "Malice", "alicia", "carol"] {
        repo.create(user(name, &format!("{}@example.com", name)))
            .await
            .unwrap();
    }

    let names = |users: Vec<User>| users.into_iter().map(|u| u.username).collect::<Vec<_>>();

    let found = repo.search_by_username("ALI", Page::default()).await.unwrap();
    assert_eq!(names(found), vec!["alice", "Malice", "alicia"]);

    let found = repo.search_by_username("ali", Page::new(2, 1)).await.unwrap();
    assert_eq!(names(found), vec!["Malice", "alicia"]);

    let found = repo.search_by_username("ali", Page::new(2, 3)).await.unwrap();
    assert!(found.is_empty());

    let found = repo.search_by_username("zed", Page::default()).await.unwrap();
    assert!(found.is_empty());
}
