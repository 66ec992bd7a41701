//! Token service - Issues and validates signed identity tokens.
//!
//! HS256 JWTs carrying the user id, username, role, issue time and expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Token returned after successful authentication
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub expires_at: i64,
}

/// Signs and verifies identity tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret_bytes(),
            Duration::hours(config.jwt_expiration_hours),
        )
    }

    /// Issue a token for the given identity.
    pub fn issue(&self, user_id: Uuid, username: &str, role: UserRole) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl.num_seconds(),
            expires_at: claims.exp,
        })
    }

    pub fn issue_for(&self, user: &User) -> AppResult<IssuedToken> {
        self.issue(user.id, &user.username, user.role)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => {
                    tracing::debug!("Token rejected: {}", e);
                    AppError::InvalidToken
                }
            })
    }

    /// Token lifetime in whole hours
    pub fn ttl_hours(&self) -> i64 {
        self.ttl.num_seconds() / SECONDS_PER_HOUR
    }
}
