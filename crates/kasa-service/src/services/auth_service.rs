//! # Auth Service
//!
//! Registration, login, and bearer-token authentication.
//!
//! ## Rules
//! - Login failures are uniform: a wrong email and a wrong password produce
//!   the same message, so the endpoint never confirms which emails exist.
//! - Passwords are hashed with argon2id before they reach kasa-db; the
//!   plaintext is dropped at this boundary.

use serde::{Deserialize, Serialize};
use tracing::info;

use kasa_core::validation::{validate_email, validate_name, validate_password};
use kasa_core::User;
use kasa_db::Database;

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::{ServiceError, ServiceResult};

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Service for registration, login, and token validation.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
    jwt: JwtManager,
}

impl AuthService {
    /// Creates a new AuthService.
    pub fn new(db: Database, jwt: JwtManager) -> Self {
        AuthService { db, jwt }
    }

    /// Registers a new user.
    ///
    /// ## Returns
    /// * `Ok(User)` - created profile (no credentials)
    /// * `Err(Conflict)` - email already registered
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        validate_name(&request.name)?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let password_hash = hash_password(&request.password)?;
        let user = self
            .db
            .users()
            .create(&request.name, &request.email, &password_hash)
            .await?;

        info!(id = user.id, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenResponse> {
        let credentials = self
            .db
            .users()
            .get_credentials_by_email(&request.email)
            .await?;

        let credentials = match credentials {
            Some(c) if verify_password(&request.password, &c.password_hash) => c,
            // Same message for unknown email and wrong password.
            _ => {
                return Err(ServiceError::Unauthorized(
                    "Invalid email or password".to_string(),
                ))
            }
        };

        let access_token = self.jwt.generate_token(credentials.id, &credentials.email)?;
        info!(id = credentials.id, "User logged in");

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.lifetime_secs(),
        })
    }

    /// Resolves a bearer token to its user.
    ///
    /// Rejects tokens whose user has since been deleted.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self.jwt.validate_token(token)?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| ServiceError::Unauthorized("Malformed token subject".to_string()))?;

        self.db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Unknown user".to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
