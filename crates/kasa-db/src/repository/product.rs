//! # Product Repository
//!
//! CRUD operations for products.
//!
//! ## Delete Policy
//! Products referenced by the sales ledger cannot be deleted: the
//! `transaction_items.product_id` foreign key has no cascade, so the delete
//! fails with [`DbError::ForeignKeyViolation`]. Historical receipts keep
//! their name snapshot either way.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasa_core::{NewProduct, Product, ProductWithCategory};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, optionally filtered by a case-insensitive name match.
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Product>> {
        let products = match name_filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(filter) => {
                debug!(filter = %filter, "Listing products with name filter");
                let pattern = format!("%{}%", filter);
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price_cents, stock, category_id
                    FROM products
                    WHERE name LIKE ?1 COLLATE NOCASE
                    ORDER BY name
                    "#,
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price_cents, stock, category_id
                    FROM products
                    ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, category_id
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID with its category name joined in.
    pub async fn get_with_category(&self, id: i64) -> DbResult<Option<ProductWithCategory>> {
        let product = sqlx::query_as::<_, ProductWithCategory>(
            r#"
            SELECT p.id, p.name, p.price_cents, p.stock, p.category_id,
                   c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with the assigned id.
    pub async fn create(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, stock, category_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&new.name)
        .bind(new.price_cents)
        .bind(new.stock)
        .bind(new.category_id)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            price_cents: new.price_cents,
            stock: new.stock,
            category_id: new.category_id,
        })
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - zero affected rows, product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                stock = ?4,
                category_id = ?5
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Deletes a product by ID.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] when the sales ledger
    /// still references the product.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use kasa_core::{NewCategory, NewProduct};

    use crate::error::DbError;
    use crate::repository::test_support::{seed_product, test_db};

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let id = seed_product(&db, "Teh Botol", 500, 24).await;

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.name, "Teh Botol");
        assert_eq!(product.price_cents, 500);
        assert_eq!(product.stock, 24);
        assert!(product.category_id.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_with_name_filter() {
        let db = test_db().await;
        seed_product(&db, "Kopi Susu", 1500, 10).await;
        seed_product(&db, "Kopi Hitam", 1200, 10).await;
        seed_product(&db, "Teh Manis", 800, 10).await;

        let all = db.products().list(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let kopi = db.products().list(Some("kopi")).await.unwrap();
        assert_eq!(kopi.len(), 2);
        assert!(kopi.iter().all(|p| p.name.starts_with("Kopi")));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let mut product = db
            .products()
            .create(&NewProduct {
                name: "Roti".to_string(),
                price_cents: 700,
                stock: 3,
                category_id: None,
            })
            .await
            .unwrap();

        product.price_cents = 750;
        db.products().update(&product).await.unwrap();

        let updated = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(updated.price_cents, 750);

        product.id = 999;
        assert!(matches!(
            db.products().update(&product).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let id = seed_product(&db, "Air Mineral", 300, 48).await;

        db.products().delete(id).await.unwrap();
        assert!(db.products().get_by_id(id).await.unwrap().is_none());

        assert!(matches!(
            db.products().delete(id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_with_category() {
        let db = test_db().await;
        let category = db
            .categories()
            .create(&NewCategory {
                name: "Minuman".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let product = db
            .products()
            .create(&NewProduct {
                name: "Es Jeruk".to_string(),
                price_cents: 900,
                stock: 12,
                category_id: Some(category.id),
            })
            .await
            .unwrap();

        let detail = db
            .products()
            .get_with_category(product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.category_name.as_deref(), Some("Minuman"));

        // Uncategorized products join to a null category name.
        let bare = seed_product(&db, "Kerupuk", 200, 5).await;
        let detail = db.products().get_with_category(bare).await.unwrap().unwrap();
        assert!(detail.category_name.is_none());
    }
}
