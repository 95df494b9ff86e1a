//! # Transaction Repository (Checkout Engine)
//!
//! The one unit-of-work that mutates stock and appends to the sales ledger.
//!
//! ## Checkout Flow
//! ```text
//! checkout(lines)
//!      │
//!      ▼
//! validate cart (no store access)
//!      │
//!      ▼
//! BEGIN IMMEDIATE ── write lock up front, competing
//!      │             checkouts queue on busy timeout
//!      ▼
//! batched SELECT of all referenced products
//!      │
//!      ▼
//! per line, in input order:
//!   unknown id?            → ItemNotFound, rollback
//!   quantity > stock?      → InsufficientStock, rollback
//!   UPDATE stock = stock - qty WHERE stock >= qty
//!   zero rows affected?    → InsufficientStock, rollback
//!   subtotal = qty x price (checked)
//!      │
//!      ▼
//! INSERT transaction header + one line per cart line
//!      │
//!      ▼
//! COMMIT → receipt
//! ```
//!
//! ## Why the guarded UPDATE
//! Two checkouts reading the same stale stock could both pass the snapshot
//! check. The `stock >= qty` predicate on the decrement is the per-item
//! compare-and-swap that makes oversell impossible regardless of what the
//! snapshot said; the snapshot only provides names, prices, and a friendly
//! `available` figure for error messages.
//!
//! ## Known Gap
//! There is no idempotency key: a caller that retries a checkout after a
//! network failure creates a second transaction. Callers own retry policy.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::{CheckoutError, DbError, DbResult};
use kasa_core::validation::validate_cart;
use kasa_core::{CartLine, Money, Transaction, TransactionLine};

/// Snapshot of a product taken at the start of the unit-of-work.
#[derive(Debug, sqlx::FromRow)]
struct ProductSnapshot {
    id: i64,
    name: String,
    price_cents: i64,
    stock: i64,
}

/// Repository for the checkout engine and ledger reads.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Runs a checkout: validates the cart against live inventory,
    /// decrements stock, and appends the sale to the ledger, all in one
    /// store transaction.
    ///
    /// Every error return means a full rollback; stock is only ever changed
    /// by a committed checkout.
    pub async fn checkout(&self, lines: &[CartLine]) -> Result<Transaction, CheckoutError> {
        validate_cart(lines)?;

        debug!(lines = lines.len(), "Starting checkout");

        // IMMEDIATE takes the write lock before the first read so the
        // read-validate-decrement sequence cannot interleave with another
        // writer's. Competing checkouts wait on the busy timeout.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(DbError::from)?;

        // Batched read of every referenced product.
        let placeholders = (1..=lines.len())
            .map(|n| format!("?{}", n))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT id, name, price_cents, stock FROM products WHERE id IN ({})",
            placeholders
        );
        let mut query = sqlx::query_as::<_, ProductSnapshot>(&sql);
        for line in lines {
            query = query.bind(line.product_id);
        }
        let snapshots: HashMap<i64, ProductSnapshot> = query
            .fetch_all(&mut *tx)
            .await
            .map_err(DbError::from)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        // Validate and decrement per line, in input order. The first failure
        // aborts the whole cart; dropping `tx` rolls everything back.
        let mut total = Money::zero();
        let mut pending: Vec<(i64, String, i64, Money)> = Vec::with_capacity(lines.len());

        for line in lines {
            let product = snapshots
                .get(&line.product_id)
                .ok_or(CheckoutError::ItemNotFound {
                    product_id: line.product_id,
                })?;

            if product.stock < line.quantity {
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    name: product.name.clone(),
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            // The compare-and-swap decrement. Catches what the snapshot
            // check cannot: the same product appearing on multiple lines.
            let result = sqlx::query(
                "UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    name: product.name.clone(),
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            let subtotal = Money::from_cents(product.price_cents).checked_mul(line.quantity)?;
            total = total.checked_add(subtotal)?;

            pending.push((product.id, product.name.clone(), line.quantity, subtotal));
        }

        // Ledger write: header first, then one line per cart line.
        let created_at = Utc::now();
        let header = sqlx::query("INSERT INTO transactions (total_cents, created_at) VALUES (?1, ?2)")
            .bind(total.cents())
            .bind(created_at)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        let transaction_id = header.last_insert_rowid();

        let mut out_lines = Vec::with_capacity(pending.len());
        for (product_id, product_name, quantity, subtotal) in pending {
            let result = sqlx::query(
                r#"
                INSERT INTO transaction_items
                    (transaction_id, product_id, product_name, quantity, subtotal_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(transaction_id)
            .bind(product_id)
            .bind(&product_name)
            .bind(quantity)
            .bind(subtotal.cents())
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            out_lines.push(TransactionLine {
                id: result.last_insert_rowid(),
                transaction_id,
                product_id,
                product_name,
                quantity,
                subtotal_cents: subtotal.cents(),
            });
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            transaction_id = transaction_id,
            total_cents = total.cents(),
            lines = out_lines.len(),
            "Checkout committed"
        );

        Ok(Transaction {
            id: transaction_id,
            total_cents: total.cents(),
            created_at,
            lines: out_lines,
        })
    }

    /// Gets a committed transaction with its lines, or `None`.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let header = sqlx::query("SELECT id, total_cents, created_at FROM transactions WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let header = match header {
            Some(row) => row,
            None => return Ok(None),
        };

        let lines = sqlx::query_as::<_, TransactionLine>(
            r#"
            SELECT id, transaction_id, product_id, product_name, quantity, subtotal_cents
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Transaction {
            id: header.try_get("id")?,
            total_cents: header.try_get("total_cents")?,
            created_at: header.try_get("created_at")?,
            lines,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use kasa_core::error::ValidationError;
    use kasa_core::CartLine;

    use crate::error::CheckoutError;
    use crate::repository::test_support::{seed_product, test_db};

    fn line(product_id: i64, quantity: i64) -> CartLine {
        CartLine {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_successful_checkout_totals_and_stock() {
        let db = test_db().await;
        let a = seed_product(&db, "Kopi Susu", 2500, 10).await;

        let receipt = db.transactions().checkout(&[line(a, 4)]).await.unwrap();

        assert_eq!(receipt.total_cents, 10000);
        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.lines[0].product_name, "Kopi Susu");
        assert_eq!(receipt.lines[0].quantity, 4);
        assert_eq!(receipt.lines[0].subtotal_cents, 10000);

        let stock = db.products().get_by_id(a).await.unwrap().unwrap().stock;
        assert_eq!(stock, 6);
    }

    #[tokio::test]
    async fn test_total_equals_sum_of_line_subtotals() {
        let db = test_db().await;
        let a = seed_product(&db, "Kopi", 1500, 20).await;
        let b = seed_product(&db, "Teh", 800, 20).await;
        let c = seed_product(&db, "Roti", 700, 20).await;

        let receipt = db
            .transactions()
            .checkout(&[line(a, 2), line(b, 3), line(c, 1)])
            .await
            .unwrap();

        let sum: i64 = receipt.lines.iter().map(|l| l.subtotal_cents).sum();
        assert_eq!(receipt.total_cents, sum);
        assert_eq!(sum, 2 * 1500 + 3 * 800 + 700);

        // Lines come back in cart input order.
        let names: Vec<&str> = receipt
            .lines
            .iter()
            .map(|l| l.product_name.as_str())
            .collect();
        assert_eq!(names, vec!["Kopi", "Teh", "Roti"]);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_store() {
        let db = test_db().await;

        let err = db.transactions().checkout(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InvalidInput(ValidationError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let db = test_db().await;
        let a = seed_product(&db, "Kopi", 1500, 5).await;

        let err = db.transactions().checkout(&[line(a, 0)]).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidInput(_)));

        let stock = db.products().get_by_id(a).await.unwrap().unwrap().stock;
        assert_eq!(stock, 5);
    }

    #[tokio::test]
    async fn test_unknown_item_rolls_back_whole_cart() {
        let db = test_db().await;
        let a = seed_product(&db, "Kopi", 1500, 5).await;

        let err = db
            .transactions()
            .checkout(&[line(a, 2), line(999, 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::ItemNotFound { product_id: 999 }
        ));

        // The valid first line must not have been applied.
        let stock = db.products().get_by_id(a).await.unwrap().unwrap().stock;
        assert_eq!(stock, 5);
        assert!(db.transactions().get_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_whole_cart() {
        // Item A has stock 5 price 1000; B has stock 0. [{A,3},{B,1}] must
        // fail on B and leave A untouched.
        let db = test_db().await;
        let a = seed_product(&db, "Kopi", 1000, 5).await;
        let b = seed_product(&db, "Teh", 800, 0).await;

        let err = db
            .transactions()
            .checkout(&[line(a, 3), line(b, 1)])
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                product_id,
                available,
                requested,
                ..
            } => {
                assert_eq!(product_id, b);
                assert_eq!(available, 0);
                assert_eq!(requested, 1);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        let stock_a = db.products().get_by_id(a).await.unwrap().unwrap().stock;
        assert_eq!(stock_a, 5);
    }

    #[tokio::test]
    async fn test_duplicate_lines_cannot_overdraw() {
        // Two lines for the same product whose combined quantity exceeds
        // stock: the snapshot check passes both individually, the guarded
        // decrement catches the second.
        let db = test_db().await;
        let a = seed_product(&db, "Kopi", 1500, 5).await;

        let err = db
            .transactions()
            .checkout(&[line(a, 3), line(a, 3)])
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

        let stock = db.products().get_by_id(a).await.unwrap().unwrap().stock;
        assert_eq!(stock, 5);
    }

    #[tokio::test]
    async fn test_ledger_read_back() {
        let db = test_db().await;
        let a = seed_product(&db, "Kopi", 1500, 10).await;

        let receipt = db.transactions().checkout(&[line(a, 2)]).await.unwrap();

        let stored = db
            .transactions()
            .get_by_id(receipt.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_cents, receipt.total_cents);
        assert_eq!(stored.lines.len(), 1);
        assert_eq!(stored.lines[0].product_name, "Kopi");
    }

    #[tokio::test]
    async fn test_name_snapshot_survives_rename() {
        let db = test_db().await;
        let a = seed_product(&db, "Kopi Susu", 1500, 10).await;

        let receipt = db.transactions().checkout(&[line(a, 1)]).await.unwrap();

        let mut product = db.products().get_by_id(a).await.unwrap().unwrap();
        product.name = "Kopi Susu Gula Aren".to_string();
        db.products().update(&product).await.unwrap();

        let stored = db
            .transactions()
            .get_by_id(receipt.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.lines[0].product_name, "Kopi Susu");
    }

    #[tokio::test]
    async fn test_referenced_product_cannot_be_deleted() {
        let db = test_db().await;
        let a = seed_product(&db, "Kopi", 1500, 10).await;

        db.transactions().checkout(&[line(a, 1)]).await.unwrap();

        let err = db.products().delete(a).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::DbError::ForeignKeyViolation { .. }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_never_oversell() {
        // N concurrent single-unit checkouts against stock S must yield
        // exactly min(N, S) successes and N - S InsufficientStock failures.
        let db = test_db().await;
        let stock = 5i64;
        let contenders = 12;
        let a = seed_product(&db, "Kopi", 1000, stock).await;

        let mut handles = Vec::new();
        for _ in 0..contenders {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.transactions().checkout(&[line(a, 1)]).await
            }));
        }

        let mut successes = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(CheckoutError::InsufficientStock { .. }) => out_of_stock += 1,
                Err(other) => panic!("unexpected checkout error: {:?}", other),
            }
        }

        assert_eq!(successes, stock);
        assert_eq!(out_of_stock, contenders - stock);

        let remaining = db.products().get_by_id(a).await.unwrap().unwrap().stock;
        assert_eq!(remaining, 0);
    }
}
