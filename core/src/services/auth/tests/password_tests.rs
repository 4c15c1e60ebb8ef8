//! Unit tests for password hashing

use crate::services::auth::PasswordHasher;

#[test]
fn test_hash_and_verify() {
    let hasher = PasswordHasher::new(4);
    let hash = hasher.hash("correct-horse-battery").unwrap();

    assert!(hash.starts_with("$2"));
    assert!(hasher.verify("correct-horse-battery", &hash));
    assert!(!hasher.verify("wrong-horse-battery", &hash));
}

#[test]
fn test_hashes_are_salted() {
    let hasher = PasswordHasher::new(4);
    let a = hasher.hash("correct-horse-battery").unwrap();
    let b = hasher.hash("correct-horse-battery").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_malformed_hash_does_not_verify() {
    let hasher = PasswordHasher::new(4);
    assert!(!hasher.verify("anything", "not-a-bcrypt-hash"));
}

#[test]
fn test_invalid_cost_is_an_error() {
    assert!(PasswordHasher::new(99).hash("correct-horse-battery").is_err());
}

#[tokio::test]
async fn test_blocking_variants() {
    let hasher = PasswordHasher::new(4);
    let hash = hasher
        .hash_blocking("correct-horse-battery".to_string())
        .await
        .unwrap();
    assert!(
        hasher
            .verify_blocking("correct-horse-battery".to_string(), hash)
            .await
    );
}
