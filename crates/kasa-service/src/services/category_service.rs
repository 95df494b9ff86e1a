//! # Category Service

use tracing::info;

use kasa_core::validation::validate_name;
use kasa_core::{Category, NewCategory};
use kasa_db::Database;

use crate::error::{ServiceError, ServiceResult};

/// Service for category CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryService {
    db: Database,
}

impl CategoryService {
    /// Creates a new CategoryService.
    pub fn new(db: Database) -> Self {
        CategoryService { db }
    }

    /// Lists all categories.
    pub async fn list(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.db.categories().list().await?)
    }

    /// Gets a category by id.
    pub async fn get(&self, id: i64) -> ServiceResult<Category> {
        self.db
            .categories()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    /// Creates a category after validating its name.
    pub async fn create(&self, new: NewCategory) -> ServiceResult<Category> {
        validate_name(&new.name)?;

        let category = self.db.categories().create(&new).await?;
        info!(id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Replaces a category's fields.
    pub async fn update(&self, id: i64, new: NewCategory) -> ServiceResult<Category> {
        validate_name(&new.name)?;

        let category = Category {
            id,
            name: new.name,
            description: new.description,
        };
        self.db.categories().update(&category).await?;
        Ok(category)
    }

    /// Deletes a category. Products keep a null category afterwards.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.db.categories().delete(id).await?;
        info!(id = id, "Category deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
