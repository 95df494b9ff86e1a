//! # Domain Types
//!
//! Core domain types used throughout the Kasa POS backend.
//!
//! ## Type Overview
//! ```text
//! Inventory          Ledger                    Ephemeral
//! ─────────          ──────                    ─────────
//! Category           Transaction               CartLine
//! Product            TransactionLine           DailySummary (derived)
//! User
//! ```
//!
//! ## Snapshot Pattern
//! `TransactionLine` carries `product_name` copied from the product at the
//! time of sale. Renaming a product later must not rewrite sales history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::NO_BEST_SELLER;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier, assigned by the store.
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier, immutable once assigned by the store.
    pub id: i64,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price in the smallest currency unit. Never negative.
    pub price_cents: i64,

    /// Quantity-on-hand. Never negative; only checkout and CRUD mutate it.
    pub stock: i64,

    /// Optional category reference.
    pub category_id: Option<i64>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether current stock covers the requested quantity.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: Option<i64>,
}

/// A product joined with its category name, for detail views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductWithCategory {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
}

// =============================================================================
// User
// =============================================================================

/// A backend user (cashier/admin). The password hash never leaves kasa-db.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Payload for updating a user's profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
}

// =============================================================================
// Cart
// =============================================================================

/// One requested line of a checkout cart.
///
/// Ephemeral: exists only for the duration of a single checkout call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    /// Requested quantity. Must be positive.
    pub quantity: i64,
}

// =============================================================================
// Transaction (ledger)
// =============================================================================

/// A committed sale. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the store at commit time.
    pub id: i64,

    /// Sum of all line subtotals.
    pub total_cents: i64,

    /// Commit timestamp, populated by the store.
    pub created_at: DateTime<Utc>,

    /// Line items in cart input order.
    pub lines: Vec<TransactionLine>,
}

impl Transaction {
    /// Returns the total as a Money type.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item of a committed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionLine {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen snapshot).
    pub product_name: String,
    pub quantity: i64,
    /// quantity x unit price at time of sale.
    pub subtotal_cents: i64,
}

// =============================================================================
// Daily Summary (derived, never stored)
// =============================================================================

/// Aggregated sales figures for the current calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub total_revenue_cents: i64,
    pub transaction_count: i64,
    /// "-" sentinel when no sales occurred today.
    pub best_seller_name: String,
    pub best_seller_quantity: i64,
}

impl DailySummary {
    /// The summary reported when no transactions exist today.
    pub fn empty() -> Self {
        DailySummary {
            total_revenue_cents: 0,
            transaction_count: 0,
            best_seller_name: NO_BEST_SELLER.to_string(),
            best_seller_quantity: 0,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_can_fulfill() {
        let p = Product {
            id: 1,
            name: "Kopi Susu".to_string(),
            price_cents: 1500,
            stock: 5,
            category_id: None,
        };
        assert!(p.can_fulfill(5));
        assert!(!p.can_fulfill(6));
    }

    #[test]
    fn test_empty_summary_sentinel() {
        let s = DailySummary::empty();
        assert_eq!(s.total_revenue_cents, 0);
        assert_eq!(s.transaction_count, 0);
        assert_eq!(s.best_seller_name, "-");
        assert_eq!(s.best_seller_quantity, 0);
    }
}
