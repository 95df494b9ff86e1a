//! # Authentication Primitives
//!
//! JWT bearer tokens (HS256) and argon2 password hashing. The service layer
//! composes these; nothing here touches the database.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id, stringified.
    pub sub: String,
    /// Email at issuance time.
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

/// Issues and validates HS256 bearer tokens.
#[derive(Debug, Clone)]
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Creates a manager with the given signing secret and token lifetime.
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Token lifetime in seconds, as advertised in login responses.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Generates a signed token for the given user.
    pub fn generate_token(&self, user_id: i64, email: &str) -> ServiceResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + self.lifetime_secs,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token's signature and expiry, returning its claims.
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| ServiceError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

/// Hashes a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored argon2 hash.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// caller cannot distinguish it from a wrong password, which is the point.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header_value: &str) -> ServiceResult<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServiceError::Unauthorized("Malformed Authorization header".to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
