use std::fmt::Display;

use base64::Engine;
use serde::Deserialize;

/// Name claims carried in the token payload. Decoded locally, the signature
/// is the server's business.
#[derive(Deserialize, Clone, Debug)]
pub struct TokenClaims {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl TokenClaims {
    /// Full display name, available only when both claims are present.
    pub fn display_name(&self) -> Option<String> {
        match (self.given_name.as_ref(), self.family_name.as_ref()) {
            (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
            _ => None,
        }
    }
}

/// Decodes the payload segment of a bearer token without verifying the
/// signature. Pure, no network involved.
pub fn decode(token: &str) -> Result<TokenClaims, MalformedTokenError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| MalformedTokenError::new("token has no payload segment".to_string()))?;

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| MalformedTokenError::new(format!("payload is not valid base64: {}", e)))?;

    serde_json::from_slice::<TokenClaims>(&bytes)
        .map_err(|e| MalformedTokenError::new(format!("payload is not valid JSON: {}", e)))
}

#[derive(Debug)]
pub struct MalformedTokenError {
    reason: String,
}

impl MalformedTokenError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for MalformedTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed token: {}", self.reason)
    }
}

impl std::error::Error for MalformedTokenError {}
