//! # Service Error Type
//!
//! The unified error the HTTP layer sees.
//!
//! ## Error Flow
//! ```text
//! ValidationError (kasa-core) ──┐
//! DbError (kasa-db) ────────────┼──► ServiceError ──► HTTP status + body
//! CheckoutError (kasa-db) ──────┘        │
//!                                        └── code() gives a stable
//!                                            machine-readable code
//! ```

use serde::Serialize;
use thiserror::Error;

use kasa_core::error::ValidationError;
use kasa_db::{CheckoutError, DbError};

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed caller input (empty cart, bad quantity, invalid email, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Requested quantity exceeds quantity-on-hand.
    #[error("Insufficient stock for {name} (id: {product_id}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Authentication failed or the bearer token is invalid/expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The operation conflicts with existing state (duplicate email,
    /// deleting a product the ledger references).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// I/O or transport failure from the persistence layer. The caller owns
    /// retry policy; nothing is retried here.
    #[error("Store failure: {0}")]
    Store(String),

    /// Unexpected internal failure (hashing, token encoding).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable machine-readable error codes.
///
/// Serialized SCREAMING_SNAKE_CASE so HTTP clients can switch on them
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    InsufficientStock,
    Unauthorized,
    Conflict,
    StoreFailure,
    Internal,
}

impl ServiceError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::InvalidInput(_) => ErrorCode::InvalidInput,
            ServiceError::NotFound { .. } => ErrorCode::NotFound,
            ServiceError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            ServiceError::Unauthorized(_) => ErrorCode::Unauthorized,
            ServiceError::Conflict(_) => ErrorCode::Conflict,
            ServiceError::Store(_) => ErrorCode::StoreFailure,
            ServiceError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            DbError::UniqueViolation { field } => {
                ServiceError::Conflict(format!("Duplicate {}", field))
            }
            DbError::ForeignKeyViolation { message } => ServiceError::Conflict(message),
            other => ServiceError::Store(other.to_string()),
        }
    }
}

impl From<CheckoutError> for ServiceError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidInput(v) => ServiceError::InvalidInput(v.to_string()),
            CheckoutError::ItemNotFound { product_id } => {
                ServiceError::not_found("Product", product_id)
            }
            CheckoutError::InsufficientStock {
                product_id,
                name,
                available,
                requested,
            } => ServiceError::InsufficientStock {
                product_id,
                name,
                available,
                requested,
            },
            CheckoutError::TotalOverflow => {
                ServiceError::InvalidInput("Cart total overflow".to_string())
            }
            CheckoutError::Store(db) => db.into(),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================
