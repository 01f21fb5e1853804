use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// JWT claims carried by every bearer token. `sub` is the user id.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token generation failed: {0}")]
    Issue(String),
}

/// Hash a plaintext password with bcrypt. Cost factor comes from config.
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, config::config().security.bcrypt_cost)
}

/// Verify a plaintext password against a stored bcrypt hash.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(plain, hash)
}

/// Issue a signed bearer token for the given user with the configured TTL.
pub fn issue_token(user_id: Uuid) -> Result<String, TokenError> {
    issue_token_with_ttl(user_id, config::config().security.token_ttl_secs)
}

pub fn issue_token_with_ttl(user_id: Uuid, ttl_secs: i64) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::Issue("JWT secret not configured".to_string()));
    }

    let claims = Claims::new(user_id, ttl_secs);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| TokenError::Issue(e.to_string()))
}

/// Verify a bearer token and recover its claims.
///
/// Fails with `InvalidSignature` when tampered or signed with another key,
/// `Expired` past the ttl, `Malformed` when not parseable as a JWT. A valid
/// token naming an unknown user is not this layer's concern.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })
}
