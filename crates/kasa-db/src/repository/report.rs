//! # Report Repository (Reporting Aggregator)
//!
//! Read-only daily aggregation over the sales ledger. Runs synchronously on
//! demand; no caching, no background tasks.
//!
//! "Today" is the store clock's calendar day: `date('now')` in SQLite, which
//! evaluates in UTC, matching the UTC timestamps the checkout engine writes.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasa_core::DailySummary;

/// Repository for ledger aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Summarizes today's sales: revenue, transaction count, best seller.
    ///
    /// Lines are grouped by their frozen name snapshot, so the figure stays
    /// accurate even if a product was renamed after the sale. Ties on
    /// quantity break deterministically toward the earliest sold line.
    /// With no sales today, revenue and count are zero and the best seller
    /// is the "-" sentinel.
    pub async fn today_summary(&self) -> DbResult<DailySummary> {
        let (total_revenue_cents, transaction_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_cents), 0), COUNT(id)
            FROM transactions
            WHERE date(created_at) = date('now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let best_seller: Option<(String, i64)> = sqlx::query_as(
            r#"
            SELECT ti.product_name, SUM(ti.quantity) AS total_qty
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            WHERE date(t.created_at) = date('now')
            GROUP BY ti.product_name
            ORDER BY total_qty DESC, MIN(ti.id) ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        debug!(
            revenue = total_revenue_cents,
            count = transaction_count,
            "Computed daily summary"
        );

        let summary = match best_seller {
            Some((name, quantity)) => DailySummary {
                total_revenue_cents,
                transaction_count,
                best_seller_name: name,
                best_seller_quantity: quantity,
            },
            None => DailySummary {
                total_revenue_cents,
                transaction_count,
                ..DailySummary::empty()
            },
        };

        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
