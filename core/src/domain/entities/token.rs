//! Token claims carried in signed access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

use super::user::{User, UserRole};

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,

    pub account_id: Uuid,

    pub username: String,

    pub role: UserRole,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates claims for `user` that expire after `lifespan_seconds`
    pub fn for_user(user: &User, lifespan_seconds: u64, issuer: &str, audience: &str) -> Self {
        let now = Utc::now().timestamp();
        let lifespan = i64::try_from(lifespan_seconds).unwrap_or(i64::MAX);

        Self {
            sub: user.account_id.to_string(),
            account_id: user.account_id,
            username: user.username.clone(),
            role: user.role,
            iat: now,
            nbf: now,
            exp: now.saturating_add(lifespan),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks the time window, issuer and audience with no leeway
    pub fn validate(&self, now: i64, issuer: &str, audience: &str) -> Result<(), TokenError> {
        if now >= self.exp {
            return Err(TokenError::TokenExpired);
        }
        if now < self.nbf {
            return Err(TokenError::TokenNotYetValid);
        }
        if self.iss != issuer || self.aud != audience {
            return Err(TokenError::InvalidClaims);
        }
        Ok(())
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// A freshly signed bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

impl IssuedToken {
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new("alice".into(), "alice@example.com".into(), "hash".into())
    }

    #[test]
    fn test_claims_for_user() {
        let user = sample_user();
        let claims = Claims::for_user(&user, 60, "issuer", "audience");

        assert_eq!(claims.sub, user.account_id.to_string());
        assert_eq!(claims.account_id, user.account_id);
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.exp - claims.iat, 60);
        assert_eq!(claims.nbf, claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_validation_window() {
        let claims = Claims::for_user(&sample_user(), 60, "iss", "aud");

        assert!(claims.validate(claims.iat, "iss", "aud").is_ok());
        assert_eq!(
            claims.validate(claims.exp, "iss", "aud"),
            Err(TokenError::TokenExpired)
        );
        assert_eq!(
            claims.validate(claims.nbf - 1, "iss", "aud"),
            Err(TokenError::TokenNotYetValid)
        );
        assert_eq!(
            claims.validate(claims.iat, "other", "aud"),
            Err(TokenError::InvalidClaims)
        );
        assert_eq!(
            claims.validate(claims.iat, "iss", "other"),
            Err(TokenError::InvalidClaims)
        );
    }

    #[test]
    fn test_bearer_token_shape() {
        let token = IssuedToken::bearer("abc".into(), 86_400);
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_in"], 86_400);
    }
}
