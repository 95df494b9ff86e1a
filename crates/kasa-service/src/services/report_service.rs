//! # Report Service
//!
//! Exposes the daily sales summary as a camelCase DTO.

use serde::{Deserialize, Serialize};

use kasa_core::DailySummary;
use kasa_db::Database;

use crate::error::ServiceResult;

/// Today's sales summary, as returned to the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_revenue: i64,
    pub total_transaction_count: i64,
    /// "-" when nothing sold today.
    pub best_seller_name: String,
    pub best_seller_quantity: i64,
}

impl From<DailySummary> for SummaryResponse {
    fn from(summary: DailySummary) -> Self {
        SummaryResponse {
            total_revenue: summary.total_revenue_cents,
            total_transaction_count: summary.transaction_count,
            best_seller_name: summary.best_seller_name,
            best_seller_quantity: summary.best_seller_quantity,
        }
    }
}

/// Service for sales reporting.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Creates a new ReportService.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Aggregates today's sales on demand. Never fails on an empty day.
    pub async fn today_summary(&self) -> ServiceResult<SummaryResponse> {
        let summary = self.db.reports().today_summary().await?;
        Ok(summary.into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::checkout_service::{CheckoutItem, CheckoutRequest, CheckoutService};
    use crate::services::test_support::{seed_product, test_db};

    #[tokio::test]
    async fn test_empty_day_sentinel() {
        let db = test_db().await;
        let service = ReportService::new(db);

        let summary = service.today_summary().await.unwrap();
        assert_eq!(summary.total_revenue, 0);
        assert_eq!(summary.total_transaction_count, 0);
        assert_eq!(summary.best_seller_name, "-");
        assert_eq!(summary.best_seller_quantity, 0);
    }

    #[tokio::test]
    async fn test_summary_reflects_sales() {
        let db = test_db().await;
        let kopi = seed_product(&db, "Kopi Susu", 1500, 20).await;

        let checkout = CheckoutService::new(db.clone());
        checkout
            .checkout(CheckoutRequest {
                items: vec![CheckoutItem {
                    item_id: kopi,
                    quantity: 4,
                }],
            })
            .await
            .unwrap();

        let summary = ReportService::new(db).today_summary().await.unwrap();
        assert_eq!(summary.total_revenue, 6000);
        assert_eq!(summary.total_transaction_count, 1);
        assert_eq!(summary.best_seller_name, "Kopi Susu");
        assert_eq!(summary.best_seller_quantity, 4);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = SummaryResponse {
            total_revenue: 100,
            total_transaction_count: 2,
            best_seller_name: "Teh".to_string(),
            best_seller_quantity: 5,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("totalRevenue").is_some());
        assert!(json.get("totalTransactionCount").is_some());
        assert!(json.get("bestSellerName").is_some());
    }
}
