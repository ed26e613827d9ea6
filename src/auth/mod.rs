use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Token claims. `user_id` is the single authoritative identity claim;
/// it is optional on the decode side so a token that validates but was
/// minted without an identity can be detected instead of failing parse.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id: Some(user_id),
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token secret is not configured")]
    InvalidSecret,
    #[error("token generation error: {0}")]
    Generation(String),
    #[error("password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

/// Sign claims with the configured secret
pub fn generate_token(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    sign_with_secret(claims, secret)
}

pub fn sign_with_secret(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::Generation(e.to_string()))
}

/// Validate signature and expiry, returning the decoded claims.
/// Callers inspect the jsonwebtoken error kind to tell an expired token
/// apart from a tampered one.
pub fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}

/// Hash a password with the configured bcrypt cost
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let cost = config::config().security.bcrypt_cost;
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}
