//! In-memory signing keyring with timed key rotation

pub mod curve;
pub mod generator;
pub mod jwk;
pub mod key;
pub mod random;
pub mod scheduler;
pub mod set;

pub use curve::{CurveType, SignatureAlgorithm};
pub use generator::{EcKeyGenerator, KeyGenerator};
pub use jwk::{JwkSet, KeyUse, PrivateJwk, PublicJwk};
pub use key::{KeyMaterial, KeyRecord};
pub use random::{OsRandom, RandomSource};
pub use scheduler::{ManualScheduler, Scheduler, Task, TimerHandle, TokioScheduler};
pub use set::{KeySet, KeyringStats, LifecyclePhase, Lifespan};

#[cfg(test)]
mod tests;
