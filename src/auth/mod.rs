use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims issued now and expiring `expiry_hours` later
    pub fn new(subject: impl Into<String>, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let lifetime = i64::try_from(expiry_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?;
        let exp = now
            .checked_add_signed(lifetime)
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?
            .timestamp();

        Ok(Self {
            sub: subject.into(),
            exp,
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Token lifetime of {0} hours is out of range")]
    InvalidExpiry(u64),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the embedded claims
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}
