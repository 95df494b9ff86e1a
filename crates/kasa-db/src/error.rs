//! # Database Error Types
//!
//! Error types for database operations and the checkout engine.
//!
//! ## Error Flow
//! ```text
//! SQLite Error (sqlx::Error)
//!       │
//!       ▼
//! DbError (this module)        ← adds context and categorization
//!       │
//!       ▼
//! CheckoutError (this module)  ← checkout-specific taxonomy
//!       │
//!       ▼
//! ServiceError (kasa-service)  ← what the HTTP layer sees
//! ```

use thiserror::Error;

use kasa_core::error::{CoreError, ValidationError};

// =============================================================================
// DbError
// =============================================================================

/// Database operation errors.
///
/// These wrap sqlx errors and provide additional context for debugging and
/// caller feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in the database (zero affected rows or empty read).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (e.g. duplicate user email).
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// Surfaces when deleting a product the sales ledger still references,
    /// or inserting a row pointing at a missing parent.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// SQLite reports constraint failures through the database error message:
/// `UNIQUE constraint failed: <table>.<column>` and
/// `FOREIGN KEY constraint failed`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// CheckoutError
// =============================================================================

/// Checkout engine errors.
///
/// Any variant other than a successful commit means the whole unit-of-work
/// rolled back: no partial stock decrement, no partial ledger write.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart itself was malformed (empty, oversized, bad quantity).
    /// Raised before the store is touched.
    #[error("Invalid cart: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A cart line referenced an unknown product id.
    #[error("Product not found: {product_id}")]
    ItemNotFound { product_id: i64 },

    /// Requested quantity exceeds quantity-on-hand.
    #[error("Insufficient stock for {name} (id: {product_id}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// A line subtotal or the cart total exceeded the i64 range.
    #[error("Cart total overflow")]
    TotalOverflow,

    /// I/O or transport failure from the persistence layer. Never retried
    /// by the engine; the caller owns retry policy.
    #[error(transparent)]
    Store(#[from] DbError),
}

impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => CheckoutError::InvalidInput(v),
            CoreError::AmountOverflow => CheckoutError::TotalOverflow,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
