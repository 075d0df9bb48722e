use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(account_id: Uuid, role: Role, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();
        Self {
            sub: account_id,
            role,
            iat: now.timestamp(),
            exp,
        }
    }
}

/// HS256 signing and verification keys, built once from config.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl JwtKeys {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        if security.jwt_secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(security.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            expiry_hours: security.jwt_expiry_hours,
        })
    }

    pub fn issue(&self, account_id: Uuid, role: Role) -> Result<String, AuthError> {
        let claims = Claims::new(account_id, role, self.expiry_hours);
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// bcrypt is CPU-bound, so it runs on the blocking pool.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(verified.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&AppConfig::development().security).unwrap()
    }

    #[test]
    fn token_round_trip() {
        let id = Uuid::new_v4();
        let token = keys().issue(id, Role::Admin).unwrap();
        let claims = keys().verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_tampered_and_foreign_tokens() {
        let token = keys().issue(Uuid::new_v4(), Role::User).unwrap();
        assert!(keys().verify(&format!("{}x", token)).is_err());

        let mut other = AppConfig::development().security;
        other.jwt_secret = "another-secret".to_string();
        let foreign = JwtKeys::from_config(&other).unwrap().issue(Uuid::new_v4(), Role::Admin).unwrap();
        assert!(matches!(keys().verify(&foreign), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn empty_secret_is_refused() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        assert!(matches!(JwtKeys::from_config(&security), Err(AuthError::InvalidSecret)));
    }

    #[tokio::test]
    async fn password_hash_round_trip() {
        let hash = hash_password("password123", 4).await.unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123", &hash).await.unwrap());
        assert!(!verify_password("wrong-password", &hash).await.unwrap());
        assert!(!verify_password("password123", "not-a-hash").await.unwrap());
    }
}
