//! HS256 session tokens issued after init-data verification.
//!
//! Claims carry the Telegram id twice (`sub` as a string, `user_id` numeric)
//! and an absolute expiry. Role is deliberately NOT in the token: it is
//! re-read from the users table on every request, so role changes apply
//! without re-issuing tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Mint a session token for a Telegram user id.
pub fn issue(telegram_id: i64, secret: &str, ttl_days: i64) -> Result<String, TokenError> {
    let exp = (Utc::now() + Duration::days(ttl_days)).timestamp();
    let claims = Claims {
        sub: telegram_id.to_string(),
        user_id: telegram_id,
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Invalid(e.to_string()))
}

/// Verify signature and expiry; returns the claims on success.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })
}
