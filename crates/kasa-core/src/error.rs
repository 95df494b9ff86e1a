//! # Error Types
//!
//! Domain-specific error types for kasa-core.
//!
//! ## Error Hierarchy
//! ```text
//! kasa-core errors (this file)
//! ├── CoreError        - General domain errors
//! └── ValidationError  - Input validation failures
//!
//! kasa-db errors (separate crate)
//! ├── DbError          - Database operation failures
//! └── CheckoutError    - Checkout engine failures (wraps the above)
//!
//! kasa-service errors (separate crate)
//! └── ServiceError     - What the HTTP layer sees
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, field name, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary computation exceeded the i64 range.
    ///
    /// Line subtotals and cart totals are computed with checked arithmetic;
    /// overflow aborts the whole operation instead of wrapping silently.
    #[error("Monetary amount overflow")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, and are surfaced
/// before any business logic or store access runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A checkout cart contained no lines.
    #[error("Cart must contain at least one line")]
    EmptyCart,

    /// A checkout cart contained more lines than allowed.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::EmptyCart;
        assert_eq!(err.to_string(), "Cart must contain at least one line");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
