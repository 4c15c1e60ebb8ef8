//! Key rotation driven by real tokio timers on a paused clock

use std::sync::Arc;
use std::time::Duration;

use kb_core::keyring::{CurveType, KeySet, LifecyclePhase, TokioScheduler};
use kb_core::services::token::{TokenService, TokenServiceConfig};
use kb_core::domain::User;
use kb_shared::KeyringConfig;
use tokio::time::sleep;

fn tokio_keyring(key_lifespan: u64, jwt_lifespan: u64) -> KeySet {
    let scheduler = TokioScheduler::current().expect("running inside tokio");
    let keyring = KeySet::new(key_lifespan, jwt_lifespan, Arc::new(scheduler)).unwrap();
    keyring.configure([CurveType::P256]).unwrap();
    keyring
}

#[tokio::test(start_paused = true)]
async fn test_rotation_timeline_with_tokio_timers() {
    let keyring = tokio_keyring(10, 4);
    let k = keyring.generate(1).unwrap().remove(0);
    assert_eq!(keyring.phase(&k), LifecyclePhase::Active);

    // t=6.5
    sleep(Duration::from_millis(6_500)).await;
    assert_eq!(keyring.phase(&k), LifecyclePhase::Expiring);
    let active = keyring.active_ids();
    assert_eq!(active.len(), 1);
    assert_ne!(active[0], k);

    // t=7
    sleep(Duration::from_millis(500)).await;
    assert!(keyring.get_key_by_id(&k).is_some());

    // t=11
    sleep(Duration::from_secs(4)).await;
    assert!(keyring.get_key_by_id(&k).is_none());
    assert_eq!(keyring.stats().active, 1);
    assert!(keyring.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_revocation_cancels_tokio_timers() {
    let keyring = tokio_keyring(10, 4);
    let kids = keyring.generate(2).unwrap();

    assert!(keyring.revoke_by_id(&kids[0]));
    sleep(Duration::from_secs(30)).await;

    // Only the surviving key's lineage remains
    assert_eq!(keyring.phase(&kids[0]), LifecyclePhase::Removed);
    assert_eq!(keyring.stats().active, 1);
    assert!(keyring.is_consistent());
}

#[tokio::test(start_paused = true)]
async fn test_bootstrap_pool_survives_many_rotations() {
    let config = KeyringConfig::new(10, 4)
        .with_curves(["P-256", "P-384"])
        .with_initial_keys(3);
    let scheduler = TokioScheduler::current().unwrap();
    let keyring = KeySet::bootstrap(&config, Arc::new(scheduler)).unwrap();

    for _ in 0..10 {
        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(keyring.stats().active, 3);
        assert!(keyring.is_consistent());
    }
}

#[tokio::test(start_paused = true)]
async fn test_tokens_stay_verifiable_while_key_is_expiring() {
    let keyring = tokio_keyring(10, 4);
    keyring.generate(1).unwrap();
    let service = TokenService::new(keyring.clone(), TokenServiceConfig::default());

    let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
    let issued = service.issue(&user).unwrap();

    sleep(Duration::from_millis(6_500)).await;
    assert_eq!(keyring.expiring_ids().len(), 1);
    assert!(service.verify(&issued.access_token).is_ok());

    sleep(Duration::from_secs(4)).await;
    assert!(service.verify(&issued.access_token).is_err());
}
