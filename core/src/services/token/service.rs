//! Main token service implementation

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use tracing::{debug, warn};

use crate::domain::entities::token::{Claims, IssuedToken};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::keyring::{KeyMaterial, KeyRecord, KeySet};

use super::config::TokenServiceConfig;
use super::jws;

/// Issues and verifies access tokens with keys from the signing keyring
#[derive(Debug, Clone)]
pub struct TokenService {
    keyring: KeySet,
    config: TokenServiceConfig,
}

impl TokenService {
    pub fn new(keyring: KeySet, config: TokenServiceConfig) -> Self {
        Self { keyring, config }
    }

    pub fn keyring(&self) -> &KeySet {
        &self.keyring
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Lifetime of issued tokens, taken from the keyring
    pub fn token_lifespan_seconds(&self) -> u64 {
        self.keyring.lifespan().jwt_lifespan_seconds()
    }

    /// Issue a bearer token for `user`, signed with a random active key
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - The signed token and its lifetime in seconds
    /// * `Err(TokenError::NoSigningKey)` - The keyring has no active key
    pub fn issue(&self, user: &User) -> Result<IssuedToken, DomainError> {
        let key = self.keyring.get_random_key().ok_or_else(|| {
            warn!("Token issuance failed: no active signing key");
            TokenError::NoSigningKey
        })?;

        let lifespan = self.token_lifespan_seconds();
        let claims = Claims::for_user(
            user,
            lifespan,
            &self.config.issuer,
            &self.config.audience,
        );
        let token = self.sign(&key, &claims)?;

        debug!("Issued token {} for {} with key {}", claims.jti, user.username, key.kid());
        Ok(IssuedToken::bearer(token, lifespan))
    }

    /// Sign arbitrary claims with a specific key
    pub fn sign(&self, key: &KeyRecord, claims: &Claims) -> Result<String, DomainError> {
        let token = match key.material() {
            KeyMaterial::P256 { encoding, .. } | KeyMaterial::P384 { encoding, .. } => {
                let algorithm = key
                    .algorithm()
                    .jwt_algorithm()
                    .ok_or(TokenError::TokenGenerationFailed)?;
                let mut header = Header::new(algorithm);
                header.kid = Some(key.kid().to_string());
                encode(&header, claims, encoding).map_err(|_| TokenError::TokenGenerationFailed)?
            }
            KeyMaterial::P521 { signing, .. } => jws::sign_es512(claims, key.kid(), signing)?,
        };

        Ok(token)
    }

    /// Verify a token against the key named by its `kid` header.
    ///
    /// Active and expiring keys both verify. Unknown or revoked keys,
    /// algorithm mismatches, bad signatures, expired or immature tokens and
    /// foreign issuers or audiences are rejected with no leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let header = jws::decode_header(token)?;
        let kid = header.kid.ok_or(TokenError::InvalidTokenFormat)?;
        let key = self.keyring.get_key_by_id(&kid).ok_or_else(|| {
            debug!("Token references unknown key {}", kid);
            TokenError::UnknownKey
        })?;

        if header.alg != key.algorithm().as_str() {
            debug!(
                "Token alg {} does not match key {} ({})",
                header.alg,
                kid,
                key.algorithm()
            );
            return Err(TokenError::InvalidSignature.into());
        }

        let claims = match key.material() {
            KeyMaterial::P256 { decoding, .. } | KeyMaterial::P384 { decoding, .. } => {
                let algorithm = key
                    .algorithm()
                    .jwt_algorithm()
                    .ok_or(TokenError::InvalidTokenFormat)?;
                let mut validation = Validation::new(algorithm);
                validation.leeway = 0;
                validation.validate_exp = true;
                validation.validate_nbf = true;
                validation.set_issuer(&[&self.config.issuer]);
                validation.set_audience(&[&self.config.audience]);

                decode::<Claims>(token, decoding, &validation)
                    .map_err(|e| map_jwt_error(e.kind()))?
                    .claims
            }
            KeyMaterial::P521 { verifying, .. } => {
                let claims = jws::verify_es512(token, verifying)?;
                claims.validate(
                    Utc::now().timestamp(),
                    &self.config.issuer,
                    &self.config.audience,
                )?;
                claims
            }
        };

        Ok(claims)
    }
}

fn map_jwt_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::MissingRequiredClaim(_) => {
            TokenError::InvalidClaims
        }
        _ => TokenError::InvalidTokenFormat,
    }
}
