//! Test doubles for keyring collaborators

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::KeyringError;
use crate::keyring::{
    CurveType, EcKeyGenerator, KeyGenerator, KeyRecord, KeySet, Lifespan, ManualScheduler,
    OsRandom, RandomSource,
};

/// Returns queued indices in order, then always zero
#[derive(Default)]
pub struct SequenceRandom {
    values: Mutex<VecDeque<usize>>,
}

impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = usize>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn index(&self, len: usize) -> usize {
        self.values.lock().unwrap().pop_front().unwrap_or(0) % len
    }
}

/// Delegates to the real generator a fixed number of times, then fails
pub struct FlakyGenerator {
    remaining: AtomicUsize,
    calls: AtomicUsize,
}

impl FlakyGenerator {
    pub fn succeeding(times: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(times),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for FlakyGenerator {
    fn generate(&self, curve: CurveType) -> Result<KeyRecord, KeyringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let allowed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if allowed {
            EcKeyGenerator::new().generate(curve)
        } else {
            Err(KeyringError::Generation {
                message: "entropy source unavailable".to_string(),
            })
        }
    }
}

/// Always hands out the same key id
pub struct FixedIdGenerator(pub &'static str);

impl KeyGenerator for FixedIdGenerator {
    fn generate(&self, _curve: CurveType) -> Result<KeyRecord, KeyringError> {
        KeyRecord::from_p256(self.0, p256::SecretKey::random(&mut rand::rngs::OsRng))
    }
}

/// A P-256 keyring on a simulated clock
pub fn manual_keyring(key_lifespan: u64, jwt_lifespan: u64) -> (KeySet, ManualScheduler) {
    manual_keyring_with(key_lifespan, jwt_lifespan, Arc::new(EcKeyGenerator::new()))
}

pub fn manual_keyring_with(
    key_lifespan: u64,
    jwt_lifespan: u64,
    generator: Arc<dyn KeyGenerator>,
) -> (KeySet, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let keyring = KeySet::with_components(
        Lifespan::new(key_lifespan, jwt_lifespan).unwrap(),
        Arc::new(scheduler.clone()),
        generator,
        Arc::new(OsRandom),
    );
    keyring.configure([CurveType::P256]).unwrap();
    (keyring, scheduler)
}
