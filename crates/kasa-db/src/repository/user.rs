//! # User Repository
//!
//! CRUD operations for users plus the credential lookup used by the auth
//! service. The password hash never crosses this crate's boundary except
//! through [`UserCredentials`], which exists only for verification.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasa_core::{User, UserUpdate};

/// A user row including the password hash, for credential verification only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserCredentials {
    /// Strips the hash, leaving the public profile.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists all users (public fields only).
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Gets a user by ID (public fields only).
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user's credentials by email, for login verification.
    pub async fn get_credentials_by_email(
        &self,
        email: &str,
    ) -> DbResult<Option<UserCredentials>> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    /// Inserts a new user with an already-hashed password.
    ///
    /// ## Returns
    /// * `Ok(User)` - Created user with the assigned id
    /// * `Err(DbError::UniqueViolation)` - email already registered
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> DbResult<User> {
        debug!(email = %email, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Updates a user's profile fields. `NotFound` on zero affected rows.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> DbResult<()> {
        debug!(id = id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?2,
                email = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Deletes a user by ID. `NotFound` on zero affected rows.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use kasa_core::UserUpdate;

    use crate::error::DbError;
    use crate::repository::test_support::test_db;

    #[tokio::test]
    async fn test_create_list_and_get() {
        let db = test_db().await;

        let user = db
            .users()
            .create("Budi", "budi@example.com", "argon2-hash-here")
            .await
            .unwrap();
        assert_eq!(user.name, "Budi");

        let listed = db.users().list().await.unwrap();
        assert_eq!(listed.len(), 1);

        let fetched = db.users().get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "budi@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = test_db().await;

        db.users()
            .create("Budi", "budi@example.com", "hash-a")
            .await
            .unwrap();

        let err = db
            .users()
            .create("Budi Kedua", "budi@example.com", "hash-b")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_credentials_lookup() {
        let db = test_db().await;

        db.users()
            .create("Siti", "siti@example.com", "hash-s")
            .await
            .unwrap();

        let creds = db
            .users()
            .get_credentials_by_email("siti@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.password_hash, "hash-s");
        assert_eq!(creds.into_user().name, "Siti");

        assert!(db
            .users()
            .get_credentials_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_not_found() {
        let db = test_db().await;

        let user = db
            .users()
            .create("Andi", "andi@example.com", "hash")
            .await
            .unwrap();

        db.users()
            .update(
                user.id,
                &UserUpdate {
                    name: "Andi Baru".to_string(),
                    email: "andi.baru@example.com".to_string(),
                },
            )
            .await
            .unwrap();

        let fetched = db.users().get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Andi Baru");

        assert!(matches!(
            db.users()
                .update(
                    999,
                    &UserUpdate {
                        name: "x".to_string(),
                        email: "x@example.com".to_string(),
                    }
                )
                .await,
            Err(DbError::NotFound { .. })
        ));

        db.users().delete(user.id).await.unwrap();
        assert!(matches!(
            db.users().delete(user.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
