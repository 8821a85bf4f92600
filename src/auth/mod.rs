pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::store::Store;

/// Token payload: who the caller is and what role they hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: String, role: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            username,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

/// Credential check and token issue/verification
#[derive(Clone)]
pub struct AuthService {
    store: Arc<Store>,
    secret: Arc<str>,
    expiry_hours: u64,
}

impl AuthService {
    pub fn new(store: Arc<Store>, secret: &str, expiry_hours: u64) -> Self {
        Self {
            store,
            secret: Arc::from(secret),
            expiry_hours,
        }
    }

    /// Exact username match plus password hash check; returns a signed token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .users
            .read(|users| users.iter().find(|u| u.username == username).cloned())
            .await;

        // bcrypt verification blocks for the whole cost factor
        let user = match user {
            Some(user) => {
                let hash = user.password_hash.clone();
                let candidate = password.to_string();
                let verified = tokio::task::spawn_blocking(move || {
                    password::verify_password(&candidate, &hash)
                })
                .await
                .unwrap_or(false);
                verified.then_some(user)
            }
            None => None,
        };

        let user = match user {
            Some(user) => user,
            None => {
                warn!("Rejected login for '{}'", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        debug!("Issuing token for '{}' ({})", user.username, user.role);
        self.issue(Claims::new(user.username, user.role, self.expiry_hours))
    }

    pub fn issue(&self, claims: Claims) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Signature and expiry check, no leeway
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
