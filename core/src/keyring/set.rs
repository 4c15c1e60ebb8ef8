//! The signing keyring and its rotation state machine.
//!
//! Every key moves through three phases:
//!
//! ```text
//! generate ──> Active ──(signing window)──> Expiring ──(key lifespan)──> Removed
//!                 └──────────────── revoke_by_id ───────────────────────────┘
//! ```
//!
//! Active keys sign new tokens. Expiring keys only verify tokens that were
//! signed while they were active. When a key leaves the active phase a
//! replacement is generated so the signing pool keeps its size.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use kb_shared::KeyringConfig;

use super::curve::CurveType;
use super::generator::{EcKeyGenerator, KeyGenerator};
use super::jwk::{JwkSet, PublicJwk};
use super::key::KeyRecord;
use super::random::{OsRandom, RandomSource};
use super::scheduler::{Scheduler, TimerHandle};
use crate::errors::KeyringError;

/// Validated key and token lifetimes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifespan {
    key_lifespan_seconds: u64,
    jwt_lifespan_seconds: u64,
}

impl Lifespan {
    /// Both values must be positive and a key must outlive every token it signs
    pub fn new(key_lifespan_seconds: u64, jwt_lifespan_seconds: u64) -> Result<Self, KeyringError> {
        if key_lifespan_seconds == 0 || jwt_lifespan_seconds == 0 {
            return Err(KeyringError::configuration(
                "key and token lifespans must be positive",
            ));
        }
        if key_lifespan_seconds < jwt_lifespan_seconds {
            return Err(KeyringError::configuration(format!(
                "key lifespan ({}s) is shorter than token lifespan ({}s)",
                key_lifespan_seconds, jwt_lifespan_seconds
            )));
        }

        Ok(Self {
            key_lifespan_seconds,
            jwt_lifespan_seconds,
        })
    }

    pub fn key_lifespan_seconds(&self) -> u64 {
        self.key_lifespan_seconds
    }

    pub fn jwt_lifespan_seconds(&self) -> u64 {
        self.jwt_lifespan_seconds
    }

    /// How long a new key stays eligible for signing
    pub fn signing_duration(&self) -> Duration {
        Duration::from_secs(self.key_lifespan_seconds - self.jwt_lifespan_seconds)
    }

    /// How long a key exists, counted from creation
    pub fn total_duration(&self) -> Duration {
        Duration::from_secs(self.key_lifespan_seconds)
    }
}

/// Where a key currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecyclePhase {
    Active,
    Expiring,
    Removed,
}

/// Key counts by phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyringStats {
    pub total: usize,
    pub active: usize,
    pub expiring: usize,
}

struct KeyTimers {
    retire: TimerHandle,
    remove: TimerHandle,
}

/// The id maps are one logical resource and always change together
#[derive(Default)]
struct RingState {
    keys: BTreeMap<String, Arc<KeyRecord>>,
    active: BTreeMap<String, KeyTimers>,
    expiring: BTreeMap<String, TimerHandle>,
}

#[derive(Clone, Copy)]
enum Transition {
    Retire,
    Remove,
}

struct Inner {
    state: RwLock<RingState>,
    curves: RwLock<Vec<CurveType>>,
    lifespan: Lifespan,
    generator: Arc<dyn KeyGenerator>,
    rng: Arc<dyn RandomSource>,
    scheduler: Arc<dyn Scheduler>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, timers) in std::mem::take(&mut state.active) {
            timers.retire.cancel();
            timers.remove.cancel();
        }
        for (_, remove) in std::mem::take(&mut state.expiring) {
            remove.cancel();
        }
    }
}

/// Concurrent in-memory signing keyring.
///
/// `KeySet` is a cheap handle; clones share the same keys. Timer callbacks
/// only hold a weak reference, so pending transitions are cancelled once
/// the last handle is dropped.
#[derive(Clone)]
pub struct KeySet {
    inner: Arc<Inner>,
}

impl KeySet {
    /// Create an empty keyring using OS randomness and EC key generation
    pub fn new(
        key_lifespan_seconds: u64,
        jwt_lifespan_seconds: u64,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, KeyringError> {
        let lifespan = Lifespan::new(key_lifespan_seconds, jwt_lifespan_seconds)?;
        Ok(Self::with_components(
            lifespan,
            scheduler,
            Arc::new(EcKeyGenerator::new()),
            Arc::new(OsRandom),
        ))
    }

    /// Create an empty keyring with explicit collaborators
    pub fn with_components(
        lifespan: Lifespan,
        scheduler: Arc<dyn Scheduler>,
        generator: Arc<dyn KeyGenerator>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(RingState::default()),
                curves: RwLock::new(Vec::new()),
                lifespan,
                generator,
                rng,
                scheduler,
            }),
        }
    }

    /// Build a keyring from configuration and generate its initial pool
    pub fn bootstrap(
        config: &KeyringConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, KeyringError> {
        let curves = config
            .curves
            .iter()
            .map(|name| name.parse::<CurveType>())
            .collect::<Result<Vec<_>, _>>()?;

        let keyring = Self::new(
            config.key_lifespan_seconds,
            config.jwt_lifespan_seconds,
            scheduler,
        )?;
        keyring.configure(curves)?;
        keyring.generate(config.initial_keys)?;

        info!(
            "Keyring ready with {} signing keys (key lifespan {}s, token lifespan {}s)",
            config.initial_keys, config.key_lifespan_seconds, config.jwt_lifespan_seconds
        );
        Ok(keyring)
    }

    /// Replace the pool of curves new keys are drawn from
    pub fn configure(
        &self,
        curves: impl IntoIterator<Item = CurveType>,
    ) -> Result<(), KeyringError> {
        let mut pool: Vec<CurveType> = curves.into_iter().collect();
        pool.sort();
        pool.dedup();

        if pool.is_empty() {
            return Err(KeyringError::configuration("curve pool must not be empty"));
        }

        debug!("Keyring curve pool set to {:?}", pool);
        *self.inner.curves.write().unwrap_or_else(PoisonError::into_inner) = pool;
        Ok(())
    }

    /// Curves currently in the draw pool
    pub fn curves(&self) -> Vec<CurveType> {
        self.inner
            .curves
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lifespan(&self) -> Lifespan {
        self.inner.lifespan
    }

    /// Generate `n` new active keys and arm their lifecycle timers.
    ///
    /// Key material is produced before the write lock is taken. If key `i`
    /// fails, the error is returned and keys `0..i` stay in the keyring.
    pub fn generate(&self, n: usize) -> Result<Vec<String>, KeyringError> {
        if n == 0 {
            return Err(KeyringError::configuration("key count must be positive"));
        }

        let pool = self.curves();
        if pool.is_empty() {
            return Err(KeyringError::configuration(
                "no curve pool configured before generating keys",
            ));
        }

        let mut kids = Vec::with_capacity(n);
        for _ in 0..n {
            let curve = pool[self.inner.rng.index(pool.len())];
            let record = self.inner.generator.generate(curve)?;
            kids.push(self.insert(record)?);
        }

        Ok(kids)
    }

    fn insert(&self, record: KeyRecord) -> Result<String, KeyringError> {
        let kid = record.kid().to_string();
        let lifespan = self.inner.lifespan;

        let mut state = self.write();
        if state.keys.contains_key(&kid) {
            return Err(KeyringError::generation(format!("duplicate key id {}", kid)));
        }

        let timers = KeyTimers {
            retire: self.arm(lifespan.signing_duration(), &kid, Transition::Retire),
            remove: self.arm(lifespan.total_duration(), &kid, Transition::Remove),
        };
        state.keys.insert(kid.clone(), Arc::new(record));
        state.active.insert(kid.clone(), timers);
        drop(state);

        debug!("Signing key {} is active", kid);
        Ok(kid)
    }

    fn arm(&self, delay: Duration, kid: &str, transition: Transition) -> TimerHandle {
        let keyring: Weak<Inner> = Arc::downgrade(&self.inner);
        let kid = kid.to_string();

        self.inner.scheduler.schedule(
            delay,
            Box::new(move || {
                let Some(inner) = keyring.upgrade() else {
                    return;
                };
                let keyring = KeySet { inner };
                match transition {
                    Transition::Retire => keyring.retire(&kid),
                    Transition::Remove => keyring.remove(&kid),
                }
            }),
        )
    }

    /// Active -> Expiring, then replenish the signing pool
    fn retire(&self, kid: &str) {
        let retired = {
            let mut state = self.write();
            match state.active.remove(kid) {
                Some(timers) => {
                    // The retire handle belongs to the running task
                    state.expiring.insert(kid.to_string(), timers.remove);
                    true
                }
                None => false,
            }
        };

        if !retired {
            return;
        }
        info!("Signing key {} retired to expiring", kid);

        if self.inner.lifespan.signing_duration().is_zero() {
            warn!("Signing window is zero, not replacing retired key {}", kid);
            return;
        }

        match self.generate(1) {
            Ok(kids) => debug!("Replaced retired key {} with {:?}", kid, kids),
            Err(e) => error!("Failed to replenish signing pool after retiring {}: {}", kid, e),
        }
    }

    /// Expiring -> Removed
    fn remove(&self, kid: &str) {
        let mut state = self.write();
        state.expiring.remove(kid);
        if let Some(timers) = state.active.remove(kid) {
            timers.retire.cancel();
        }
        let removed = state.keys.remove(kid).is_some();
        drop(state);

        if removed {
            info!("Signing key {} removed", kid);
        }
    }

    /// Pick a uniformly random active key for signing
    pub fn get_random_key(&self) -> Option<Arc<KeyRecord>> {
        let state = self.read();
        if state.active.is_empty() {
            return None;
        }

        let index = self.inner.rng.index(state.active.len());
        let kid = state.active.keys().nth(index)?;
        state.keys.get(kid).cloned()
    }

    /// Look up an active or expiring key
    pub fn get_key_by_id(&self, kid: &str) -> Option<Arc<KeyRecord>> {
        self.read().keys.get(kid).cloned()
    }

    /// Remove a key immediately and cancel its pending transitions.
    ///
    /// Returns whether the key was present. Revoking an unknown id is a no-op.
    pub fn revoke_by_id(&self, kid: &str) -> bool {
        let mut state = self.write();
        if let Some(timers) = state.active.remove(kid) {
            timers.retire.cancel();
            timers.remove.cancel();
        }
        if let Some(remove) = state.expiring.remove(kid) {
            remove.cancel();
        }
        let removed = state.keys.remove(kid).is_some();
        drop(state);

        if removed {
            info!("Signing key {} revoked", kid);
        } else {
            debug!("Revoke of unknown key {} ignored", kid);
        }
        removed
    }

    pub fn phase(&self, kid: &str) -> LifecyclePhase {
        let state = self.read();
        if state.active.contains_key(kid) {
            LifecyclePhase::Active
        } else if state.expiring.contains_key(kid) {
            LifecyclePhase::Expiring
        } else {
            LifecyclePhase::Removed
        }
    }

    /// Ids of keys eligible for signing, sorted
    pub fn active_ids(&self) -> Vec<String> {
        self.read().active.keys().cloned().collect()
    }

    /// Ids of keys kept for verification only, sorted
    pub fn expiring_ids(&self) -> Vec<String> {
        self.read().expiring.keys().cloned().collect()
    }

    pub fn stats(&self) -> KeyringStats {
        let state = self.read();
        KeyringStats {
            total: state.keys.len(),
            active: state.active.len(),
            expiring: state.expiring.len(),
        }
    }

    /// Check that every tracked id has a record and sits in exactly one phase
    pub fn is_consistent(&self) -> bool {
        let state = self.read();
        let tracked = state
            .active
            .keys()
            .chain(state.expiring.keys())
            .all(|kid| state.keys.contains_key(kid));
        let disjoint = state
            .active
            .keys()
            .all(|kid| !state.expiring.contains_key(kid));
        let complete = state.keys.len() == state.active.len() + state.expiring.len();

        tracked && disjoint && complete
    }

    /// Public keys of every active and expiring key, ordered by key id
    pub fn public_snapshot(&self) -> JwkSet<PublicJwk> {
        let state = self.read();
        JwkSet::new(state.keys.values().map(|key| key.to_public_jwk()).collect())
    }

    /// Every active and expiring key including private material, ordered by
    /// key id. For in-process use only.
    pub fn private_snapshot(&self) -> Vec<Arc<KeyRecord>> {
        self.read().keys.values().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, RingState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RingState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("lifespan", &self.inner.lifespan)
            .field("curves", &self.curves())
            .field("stats", &self.stats())
            .finish()
    }
}
