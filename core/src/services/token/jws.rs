//! Compact JWS helpers for header inspection and ES512

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use p521::ecdsa::signature::{Signer, Verifier};
use p521::ecdsa::{Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::Claims;
use crate::errors::TokenError;

/// The protected header fields needed to pick a verification key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

fn split(token: &str) -> Result<(&str, &str, &str), TokenError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(TokenError::InvalidTokenFormat),
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::InvalidTokenFormat)
}

/// Read the protected header without verifying anything.
///
/// Unlike `jsonwebtoken::decode_header` this accepts any `alg` value,
/// including ES512.
pub fn decode_header(token: &str) -> Result<JwsHeader, TokenError> {
    let (header, _, _) = split(token)?;
    serde_json::from_slice(&decode_segment(header)?).map_err(|_| TokenError::InvalidTokenFormat)
}

/// Sign `claims` as an ES512 compact JWS
pub(crate) fn sign_es512(
    claims: &Claims,
    kid: &str,
    key: &SigningKey,
) -> Result<String, TokenError> {
    let header = JwsHeader {
        alg: "ES512".to_string(),
        typ: Some("JWT".to_string()),
        kid: Some(kid.to_string()),
    };

    let header = serde_json::to_vec(&header).map_err(|_| TokenError::TokenGenerationFailed)?;
    let payload = serde_json::to_vec(claims).map_err(|_| TokenError::TokenGenerationFailed)?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );

    // Fixed-width r || s, as JWS requires
    let signature: Signature = key.sign(signing_input.as_bytes());
    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

/// Verify an ES512 signature and return the decoded claims.
///
/// Time, issuer and audience checks are left to the caller.
pub(crate) fn verify_es512(token: &str, key: &VerifyingKey) -> Result<Claims, TokenError> {
    let (header, payload, signature) = split(token)?;

    let signature = Signature::from_slice(&decode_segment(signature)?)
        .map_err(|_| TokenError::InvalidSignature)?;
    let signing_input = format!("{}.{}", header, payload);
    key.verify(signing_input.as_bytes(), &signature)
        .map_err(|_| TokenError::InvalidSignature)?;

    serde_json::from_slice(&decode_segment(payload)?).map_err(|_| TokenError::InvalidTokenFormat)
}
