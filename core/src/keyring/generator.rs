//! Fresh key material generation

use rand::rngs::OsRng;
use uuid::Uuid;

use super::curve::CurveType;
use super::key::KeyRecord;
use crate::errors::KeyringError;

/// Produces one new signing key for a curve
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, curve: CurveType) -> Result<KeyRecord, KeyringError>;
}

/// Generates EC keys from the operating system CSPRNG with UUID v4 key ids
#[derive(Debug, Clone, Copy, Default)]
pub struct EcKeyGenerator;

impl EcKeyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl KeyGenerator for EcKeyGenerator {
    fn generate(&self, curve: CurveType) -> Result<KeyRecord, KeyringError> {
        let kid = Uuid::new_v4().to_string();

        let record = match curve {
            CurveType::P256 => KeyRecord::from_p256(kid, p256::SecretKey::random(&mut OsRng))?,
            CurveType::P384 => KeyRecord::from_p384(kid, p384::SecretKey::random(&mut OsRng))?,
            CurveType::P521 => KeyRecord::from_p521(kid, p521::SecretKey::random(&mut OsRng))?,
        };

        tracing::debug!(kid = %record.kid(), curve = %curve, "Generated signing key");
        Ok(record)
    }
}
