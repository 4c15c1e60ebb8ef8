//! JSON Web Key representations published by the keyring

use serde::{Deserialize, Serialize};

/// Intended use of a key; the keyring only holds signature keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyUse {
    Sig,
}

/// Public-only EC key, safe to hand to external verifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicJwk {
    pub kty: String,
    pub kid: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: KeyUse,
    pub crv: String,
    /// Base64url (unpadded) affine x coordinate
    pub x: String,
    /// Base64url (unpadded) affine y coordinate
    pub y: String,
}

/// EC key including the private scalar `d`. Never leaves the process.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateJwk {
    #[serde(flatten)]
    pub public: PublicJwk,
    pub d: String,
}

impl std::fmt::Debug for PrivateJwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateJwk")
            .field("public", &self.public)
            .field("d", &"<redacted>")
            .finish()
    }
}

/// The `{"keys": [...]}` document served by the discovery endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet<K = PublicJwk> {
    pub keys: Vec<K>,
}

impl<K> JwkSet<K> {
    pub fn new(keys: Vec<K>) -> Self {
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl JwkSet<PublicJwk> {
    /// Look up a key by its `kid`
    pub fn find(&self, kid: &str) -> Option<&PublicJwk> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}
