//! # User Service
//!
//! User profile CRUD. Registration and password handling live in
//! [`crate::services::auth_service`]; this service never sees a password.

use tracing::info;

use kasa_core::validation::{validate_email, validate_name};
use kasa_core::{User, UserUpdate};
use kasa_db::Database;

use crate::error::{ServiceError, ServiceResult};

/// Service for user CRUD operations.
#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    /// Creates a new UserService.
    pub fn new(db: Database) -> Self {
        UserService { db }
    }

    /// Lists all users (public fields only).
    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(self.db.users().list().await?)
    }

    /// Gets a user by id.
    pub async fn get(&self, id: i64) -> ServiceResult<User> {
        self.db
            .users()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Updates a user's profile fields.
    pub async fn update(&self, id: i64, update: UserUpdate) -> ServiceResult<User> {
        validate_name(&update.name)?;
        validate_email(&update.email)?;

        self.db.users().update(id, &update).await?;
        Ok(User {
            id,
            name: update.name,
            email: update.email,
        })
    }

    /// Deletes a user.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.db.users().delete(id).await?;
        info!(id = id, "User deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
