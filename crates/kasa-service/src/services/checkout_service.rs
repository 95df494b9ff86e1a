//! # Checkout Service
//!
//! Maps the external checkout contract (camelCase JSON DTOs) onto the
//! atomic checkout engine and turns the committed ledger entry into a
//! receipt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use kasa_core::{CartLine, Transaction};
use kasa_db::Database;

use crate::error::ServiceResult;

/// One requested cart line, as the HTTP layer sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub item_id: i64,
    pub quantity: i64,
}

/// A checkout request: the full cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

/// A line of a committed receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub item_id: i64,
    /// Item name at time of sale.
    pub item_name: String,
    pub quantity: i64,
    pub subtotal: i64,
}

/// The receipt returned for a committed checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_id: i64,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
}

impl From<Transaction> for Receipt {
    fn from(txn: Transaction) -> Self {
        Receipt {
            transaction_id: txn.id,
            total_amount: txn.total_cents,
            created_at: txn.created_at,
            lines: txn
                .lines
                .into_iter()
                .map(|line| ReceiptLine {
                    item_id: line.product_id,
                    item_name: line.product_name,
                    quantity: line.quantity,
                    subtotal: line.subtotal_cents,
                })
                .collect(),
        }
    }
}

/// Service wrapping the atomic checkout engine.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Runs a checkout: all lines commit, or none do.
    ///
    /// ## Returns
    /// * `Ok(Receipt)` - the sale committed; stock is already decremented
    /// * `Err(ServiceError)` - nothing was written; stock is untouched
    pub async fn checkout(&self, request: CheckoutRequest) -> ServiceResult<Receipt> {
        let lines: Vec<CartLine> = request
            .items
            .iter()
            .map(|item| CartLine {
                product_id: item.item_id,
                quantity: item.quantity,
            })
            .collect();

        let txn = self.db.transactions().checkout(&lines).await?;

        info!(
            transaction_id = txn.id,
            total_cents = txn.total_cents,
            line_count = txn.lines.len(),
            "Checkout committed"
        );

        Ok(txn.into())
    }

    /// Fetches a past receipt by transaction id.
    pub async fn get_receipt(&self, transaction_id: i64) -> ServiceResult<Receipt> {
        let txn = self
            .db
            .transactions()
            .get_by_id(transaction_id)
            .await?
            .ok_or_else(|| crate::error::ServiceError::not_found("Transaction", transaction_id))?;

        Ok(txn.into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, ServiceError};
    use crate::services::test_support::{seed_product, test_db};

    fn request(items: Vec<(i64, i64)>) -> CheckoutRequest {
        CheckoutRequest {
            items: items
                .into_iter()
                .map(|(item_id, quantity)| CheckoutItem { item_id, quantity })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_checkout_returns_receipt() {
        let db = test_db().await;
        let kopi = seed_product(&db, "Kopi Susu", 1500, 10).await;
        let teh = seed_product(&db, "Teh Manis", 800, 10).await;

        let service = CheckoutService::new(db.clone());
        let receipt = service
            .checkout(request(vec![(kopi, 2), (teh, 1)]))
            .await
            .unwrap();

        assert_eq!(receipt.total_amount, 2 * 1500 + 800);
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[0].item_name, "Kopi Susu");
        assert_eq!(receipt.lines[0].subtotal, 3000);

        // Stock decremented on the committed path.
        let product = db.products().get_by_id(kopi).await.unwrap().unwrap();
        assert_eq!(product.stock, 8);
    }

    #[tokio::test]
    async fn test_insufficient_stock_surfaces_typed_error() {
        let db = test_db().await;
        let kopi = seed_product(&db, "Kopi Susu", 1500, 2).await;

        let service = CheckoutService::new(db.clone());
        let err = service.checkout(request(vec![(kopi, 5)])).await.unwrap_err();

        match err {
            ServiceError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        // Nothing was written.
        let product = db.products().get_by_id(kopi).await.unwrap().unwrap();
        assert_eq!(product.stock, 2);
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let db = test_db().await;
        let service = CheckoutService::new(db);

        let err = service.checkout(request(vec![(999, 1)])).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;
        let service = CheckoutService::new(db);

        let err = service.checkout(request(vec![])).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_get_receipt_roundtrip() {
        let db = test_db().await;
        let kopi = seed_product(&db, "Kopi Susu", 1500, 10).await;

        let service = CheckoutService::new(db);
        let receipt = service.checkout(request(vec![(kopi, 3)])).await.unwrap();

        let fetched = service.get_receipt(receipt.transaction_id).await.unwrap();
        assert_eq!(fetched.total_amount, receipt.total_amount);
        assert_eq!(fetched.lines.len(), 1);

        let err = service.get_receipt(9999).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_receipt_serializes_camel_case() {
        let receipt = Receipt {
            transaction_id: 7,
            total_amount: 4500,
            created_at: Utc::now(),
            lines: vec![ReceiptLine {
                item_id: 1,
                item_name: "Kopi".to_string(),
                quantity: 3,
                subtotal: 4500,
            }],
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json.get("transactionId").is_some());
        assert!(json.get("totalAmount").is_some());
        assert!(json["lines"][0].get("itemName").is_some());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: CheckoutRequest =
            serde_json::from_str(r#"{"items":[{"itemId":3,"quantity":2}]}"#).unwrap();
        assert_eq!(request.items[0].item_id, 3);
        assert_eq!(request.items[0].quantity, 2);
    }
}
