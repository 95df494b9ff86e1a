//! # Category Repository
//!
//! CRUD operations for product categories.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasa_core::{Category, NewCategory};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category and returns it with the assigned id.
    pub async fn create(&self, new: &NewCategory) -> DbResult<Category> {
        debug!(name = %new.name, "Inserting category");

        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, description)
            VALUES (?1, ?2)
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .execute(&self.pool)
        .await?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
        })
    }

    /// Updates an existing category. `NotFound` on zero affected rows.
    pub async fn update(&self, category: &Category) -> DbResult<()> {
        debug!(id = category.id, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                description = ?3
            WHERE id = ?1
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", category.id));
        }

        Ok(())
    }

    /// Deletes a category by ID. `NotFound` on zero affected rows.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
