//! # Product Service
//!
//! Product CRUD with validation at the edge. Stock changes here are
//! administrative restocks/corrections; sales go through checkout only.

use tracing::info;

use kasa_core::validation::{validate_name, validate_price_cents, validate_stock};
use kasa_core::{NewProduct, Product, ProductWithCategory};
use kasa_db::Database;

use crate::error::{ServiceError, ServiceResult};

/// Service for product CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    /// Creates a new ProductService.
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Lists products, optionally filtered by name (case-insensitive).
    pub async fn list(&self, name_filter: Option<&str>) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list(name_filter).await?)
    }

    /// Gets a product by id, with its category name joined in.
    pub async fn get(&self, id: i64) -> ServiceResult<ProductWithCategory> {
        self.db
            .products()
            .get_with_category(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    /// Creates a product after validating all fields.
    pub async fn create(&self, new: NewProduct) -> ServiceResult<Product> {
        Self::validate(&new)?;
        self.check_category(new.category_id).await?;

        let product = self.db.products().create(&new).await?;
        info!(id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replaces a product's fields.
    pub async fn update(&self, id: i64, new: NewProduct) -> ServiceResult<Product> {
        Self::validate(&new)?;
        self.check_category(new.category_id).await?;

        let product = Product {
            id,
            name: new.name,
            price_cents: new.price_cents,
            stock: new.stock,
            category_id: new.category_id,
        };
        self.db.products().update(&product).await?;
        Ok(product)
    }

    /// Deletes a product.
    ///
    /// Fails with `Conflict` when the sales ledger references the product;
    /// history is never rewritten to make a delete possible.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.db.products().delete(id).await?;
        info!(id = id, "Product deleted");
        Ok(())
    }

    fn validate(new: &NewProduct) -> ServiceResult<()> {
        validate_name(&new.name)?;
        validate_price_cents(new.price_cents)?;
        validate_stock(new.stock)?;
        Ok(())
    }

    /// Rejects references to categories that do not exist, up front, so the
    /// caller gets a NotFound instead of a raw constraint failure.
    async fn check_category(&self, category_id: Option<i64>) -> ServiceResult<()> {
        if let Some(cid) = category_id {
            if self.db.categories().get_by_id(cid).await?.is_none() {
                return Err(ServiceError::not_found("Category", cid));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
