//! Key records held by the keyring

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::EncodePrivateKey as _;

use super::curve::{CurveType, SignatureAlgorithm};
use super::jwk::{KeyUse, PrivateJwk, PublicJwk};
use crate::errors::KeyringError;

/// Private key plus the ready-to-use signing and verification handles.
///
/// P-256 and P-384 keys carry `jsonwebtoken` handles. P-521 keys carry
/// RustCrypto ECDSA keys because `jsonwebtoken` cannot sign ES512.
#[derive(Clone)]
pub enum KeyMaterial {
    P256 {
        secret: p256::SecretKey,
        encoding: EncodingKey,
        decoding: DecodingKey,
    },
    P384 {
        secret: p384::SecretKey,
        encoding: EncodingKey,
        decoding: DecodingKey,
    },
    P521 {
        secret: p521::SecretKey,
        signing: p521::ecdsa::SigningKey,
        verifying: p521::ecdsa::VerifyingKey,
    },
}

/// Affine public coordinates, already base64url encoded
#[derive(Debug, Clone, PartialEq, Eq)]
struct Coordinates {
    x: String,
    y: String,
}

fn coordinates(point: &[u8], curve: CurveType) -> Result<Coordinates, KeyringError> {
    // Uncompressed SEC1: 0x04 || x || y
    let len = curve.coordinate_len();
    if point.len() != 1 + 2 * len || point[0] != 0x04 {
        return Err(KeyringError::generation(format!(
            "unexpected {} public point encoding",
            curve
        )));
    }

    Ok(Coordinates {
        x: URL_SAFE_NO_PAD.encode(&point[1..=len]),
        y: URL_SAFE_NO_PAD.encode(&point[1 + len..]),
    })
}

fn jwt_handles(
    pkcs8_der: &[u8],
    coords: &Coordinates,
) -> Result<(EncodingKey, DecodingKey), KeyringError> {
    let encoding = EncodingKey::from_ec_der(pkcs8_der);
    let decoding = DecodingKey::from_ec_components(&coords.x, &coords.y)
        .map_err(|e| KeyringError::generation(format!("invalid public key: {}", e)))?;
    Ok((encoding, decoding))
}

impl KeyMaterial {
    pub fn curve(&self) -> CurveType {
        match self {
            KeyMaterial::P256 { .. } => CurveType::P256,
            KeyMaterial::P384 { .. } => CurveType::P384,
            KeyMaterial::P521 { .. } => CurveType::P521,
        }
    }

    fn from_p256(secret: p256::SecretKey) -> Result<(Self, Coordinates), KeyringError> {
        let point = secret.public_key().to_encoded_point(false);
        let coords = coordinates(point.as_bytes(), CurveType::P256)?;
        let der = secret
            .to_pkcs8_der()
            .map_err(|e| KeyringError::generation(format!("PKCS#8 encoding failed: {}", e)))?;
        let (encoding, decoding) = jwt_handles(der.as_bytes(), &coords)?;

        Ok((
            KeyMaterial::P256 {
                secret,
                encoding,
                decoding,
            },
            coords,
        ))
    }

    fn from_p384(secret: p384::SecretKey) -> Result<(Self, Coordinates), KeyringError> {
        let point = secret.public_key().to_encoded_point(false);
        let coords = coordinates(point.as_bytes(), CurveType::P384)?;
        let der = p384::pkcs8::EncodePrivateKey::to_pkcs8_der(&secret)
            .map_err(|e| KeyringError::generation(format!("PKCS#8 encoding failed: {}", e)))?;
        let (encoding, decoding) = jwt_handles(der.as_bytes(), &coords)?;

        Ok((
            KeyMaterial::P384 {
                secret,
                encoding,
                decoding,
            },
            coords,
        ))
    }

    fn from_p521(secret: p521::SecretKey) -> Result<(Self, Coordinates), KeyringError> {
        let point = secret.public_key().to_encoded_point(false);
        let coords = coordinates(point.as_bytes(), CurveType::P521)?;
        let signing = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
            .map_err(|e| KeyringError::generation(format!("invalid P-521 scalar: {}", e)))?;
        let verifying = p521::ecdsa::VerifyingKey::from_sec1_bytes(point.as_bytes())
            .map_err(|e| KeyringError::generation(format!("invalid P-521 point: {}", e)))?;

        Ok((
            KeyMaterial::P521 {
                secret,
                signing,
                verifying,
            },
            coords,
        ))
    }

    /// Big-endian private scalar
    fn secret_bytes(&self) -> Vec<u8> {
        match self {
            KeyMaterial::P256 { secret, .. } => secret.to_bytes().to_vec(),
            KeyMaterial::P384 { secret, .. } => secret.to_bytes().to_vec(),
            KeyMaterial::P521 { secret, .. } => secret.to_bytes().to_vec(),
        }
    }
}

/// One signing key and its metadata.
///
/// Records are immutable once created and shared as `Arc<KeyRecord>`.
/// Lifecycle phase is tracked by the owning keyring, not stored here.
#[derive(Clone)]
pub struct KeyRecord {
    kid: String,
    material: KeyMaterial,
    coords: Coordinates,
    created_at: DateTime<Utc>,
}

impl std::fmt::Debug for KeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRecord")
            .field("kid", &self.kid)
            .field("curve", &self.curve())
            .field("alg", &self.algorithm())
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl KeyRecord {
    pub fn from_p256(kid: impl Into<String>, secret: p256::SecretKey) -> Result<Self, KeyringError> {
        let (material, coords) = KeyMaterial::from_p256(secret)?;
        Ok(Self::assemble(kid.into(), material, coords))
    }

    pub fn from_p384(kid: impl Into<String>, secret: p384::SecretKey) -> Result<Self, KeyringError> {
        let (material, coords) = KeyMaterial::from_p384(secret)?;
        Ok(Self::assemble(kid.into(), material, coords))
    }

    pub fn from_p521(kid: impl Into<String>, secret: p521::SecretKey) -> Result<Self, KeyringError> {
        let (material, coords) = KeyMaterial::from_p521(secret)?;
        Ok(Self::assemble(kid.into(), material, coords))
    }

    fn assemble(kid: String, material: KeyMaterial, coords: Coordinates) -> Self {
        Self {
            kid,
            material,
            coords,
            created_at: Utc::now(),
        }
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn curve(&self) -> CurveType {
        self.material.curve()
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.curve().algorithm()
    }

    pub fn key_use(&self) -> KeyUse {
        KeyUse::Sig
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Base64url x and y coordinates of the public point
    pub fn public_coordinates(&self) -> (&str, &str) {
        (&self.coords.x, &self.coords.y)
    }

    pub fn to_public_jwk(&self) -> PublicJwk {
        PublicJwk {
            kty: "EC".to_string(),
            kid: self.kid.clone(),
            alg: self.algorithm().as_str().to_string(),
            key_use: self.key_use(),
            crv: self.curve().jwk_name().to_string(),
            x: self.coords.x.clone(),
            y: self.coords.y.clone(),
        }
    }

    pub fn to_private_jwk(&self) -> PrivateJwk {
        PrivateJwk {
            public: self.to_public_jwk(),
            d: URL_SAFE_NO_PAD.encode(self.material.secret_bytes()),
        }
    }
}
