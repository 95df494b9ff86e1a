//! # Repository Module
//!
//! Database repository implementations for the Kasa POS backend.
//!
//! The Repository pattern keeps all SQL in one place behind a typed API:
//! services call `db.products().get_by_id(7)` and never see a query string.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD
//! - [`category::CategoryRepository`] - Category CRUD
//! - [`user::UserRepository`] - User CRUD and auth lookups
//! - [`checkout::TransactionRepository`] - Checkout engine and ledger reads
//! - [`report::ReportRepository`] - Daily sales aggregation

pub mod category;
pub mod checkout;
pub mod product;
pub mod report;
pub mod user;
