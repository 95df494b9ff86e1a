//! # kasa-db: Database Layer for the Kasa POS Backend
//!
//! SQLite persistence via sqlx: connection pooling, embedded migrations,
//! repositories, the checkout engine, and the reporting aggregator.
//!
//! ## Data Flow
//! ```text
//! Service layer (kasa-service)
//!       │
//!       ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     kasa-db (THIS CRATE)                    │
//! │                                                             │
//! │   Database (pool.rs)   Repositories        Migrations       │
//! │   SqlitePool, WAL      product.rs          001_initial..    │
//! │   busy timeout         category.rs         (embedded)       │
//! │                        user.rs                              │
//! │                        checkout.rs  ◄── the unit-of-work    │
//! │                        report.rs                            │
//! └─────────────────────────────────────────────────────────────┘
//!       │
//!       ▼
//! SQLite database file (or :memory: in tests)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kasa_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kasa.db")).await?;
//! let receipt = db.transactions().checkout(&lines).await?;
//! let summary = db.reports().today_summary().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{CheckoutError, DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::checkout::TransactionRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::user::UserRepository;
