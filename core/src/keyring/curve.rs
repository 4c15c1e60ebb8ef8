//! Curve choices and the signature algorithms they map to

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::KeyringError;

/// Elliptic curve a signing key is generated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurveType {
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
    #[serde(rename = "P-521")]
    P521,
}

/// JWS signature algorithm identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    ES256,
    ES384,
    ES512,
}

impl CurveType {
    /// Every supported curve, weakest first
    pub const ALL: [CurveType; 3] = [CurveType::P256, CurveType::P384, CurveType::P521];

    /// Signature algorithm used with keys on this curve
    pub fn algorithm(self) -> SignatureAlgorithm {
        match self {
            CurveType::P256 => SignatureAlgorithm::ES256,
            CurveType::P384 => SignatureAlgorithm::ES384,
            CurveType::P521 => SignatureAlgorithm::ES512,
        }
    }

    /// The JWK `crv` parameter
    pub fn jwk_name(self) -> &'static str {
        match self {
            CurveType::P256 => "P-256",
            CurveType::P384 => "P-384",
            CurveType::P521 => "P-521",
        }
    }

    /// Size in bytes of one affine coordinate
    pub fn coordinate_len(self) -> usize {
        match self {
            CurveType::P256 => 32,
            CurveType::P384 => 48,
            CurveType::P521 => 66,
        }
    }
}

impl SignatureAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureAlgorithm::ES256 => "ES256",
            SignatureAlgorithm::ES384 => "ES384",
            SignatureAlgorithm::ES512 => "ES512",
        }
    }

    /// The matching `jsonwebtoken` algorithm.
    ///
    /// `jsonwebtoken` has no ES512 support, so P-521 keys sign through
    /// the `p521` crate instead and this returns `None`.
    pub fn jwt_algorithm(self) -> Option<jsonwebtoken::Algorithm> {
        match self {
            SignatureAlgorithm::ES256 => Some(jsonwebtoken::Algorithm::ES256),
            SignatureAlgorithm::ES384 => Some(jsonwebtoken::Algorithm::ES384),
            SignatureAlgorithm::ES512 => None,
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jwk_name())
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveType {
    type Err = KeyringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "").as_str() {
            "P256" => Ok(CurveType::P256),
            "P384" => Ok(CurveType::P384),
            "P521" => Ok(CurveType::P521),
            _ => Err(KeyringError::configuration(format!("unknown curve type: {}", s))),
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = KeyringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ES256" => Ok(SignatureAlgorithm::ES256),
            "ES384" => Ok(SignatureAlgorithm::ES384),
            "ES512" => Ok(SignatureAlgorithm::ES512),
            _ => Err(KeyringError::configuration(format!("unsupported algorithm: {}", s))),
        }
    }
}
