//! JWT access token handling

use std::fmt;

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT validation error
#[derive(Debug)]
pub enum JwtError {
    /// Token has expired
    Expired,
    /// Token signature is invalid
    InvalidSignature,
    /// Other validation error
    Invalid(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Access token has expired"),
            Self::InvalidSignature => write!(f, "Invalid access token signature"),
            Self::Invalid(msg) => write!(f, "Invalid access token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id as a decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl AccessClaims {
    pub fn new(user_id: i64, ttl_minutes: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(ttl_minutes as i64);

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parse the user id out of the verified claims
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Create a signed JWT access token
pub fn create_access_token(
    signing_key: &[u8],
    user_id: i64,
    ttl_minutes: u64,
) -> Result<String> {
    let claims = AccessClaims::new(user_id, ttl_minutes);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Validate and decode a JWT access token
pub fn validate_access_token(token: &str, signing_key: &[u8]) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data =
        decode::<AccessClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        vec![0u8; 32]
    }

    #[test]
    fn test_create_and_validate() {
        let key = test_key();
        let token = create_access_token(&key, 42, 120).unwrap();
        let claims = validate_access_token(&token, &key).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id(), Some(42));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_signature() {
        let key1 = vec![0u8; 32];
        let key2 = vec![1u8; 32];
        let token = create_access_token(&key1, 1, 120).unwrap();
        let err = validate_access_token(&token, &key2).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_invalid() {
        let key = test_key();
        assert!(validate_access_token("not.a.jwt", &key).is_err());
        assert!(validate_access_token("", &key).is_err());
    }

    #[test]
    fn test_expired_token_rejected_despite_valid_signature() {
        let key = test_key();
        // Hand-build claims already in the past
        let claims = AccessClaims {
            sub: "1".to_string(),
            iat: Utc::now().timestamp() - 600,
            exp: Utc::now().timestamp() - 300,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&key),
        )
        .unwrap();

        let err = validate_access_token(&token, &key).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_non_numeric_sub_yields_no_user_id() {
        let claims = AccessClaims {
            sub: "abc".to_string(),
            iat: 0,
            exp: 0,
            jti: String::new(),
        };
        assert_eq!(claims.user_id(), None);
    }

    #[test]
    fn test_unique_jti() {
        let c1 = AccessClaims::new(1, 120);
        let c2 = AccessClaims::new(1, 120);
        assert_ne!(c1.jti, c2.jti);
    }
}
