//! # Validation Module
//!
//! Input validation for the Kasa POS backend.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: Service layer (this module)   - business rule validation
//! Layer 2: Database (SQLite)             - NOT NULL / UNIQUE / CHECK / FK
//! ```
//! Defense in depth: the store constraints back up these checks, but callers
//! get typed errors from here before any store round trip happens.

use crate::error::ValidationError;
use crate::types::CartLine;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or category name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Deliberately shallow: the authoritative uniqueness check is the store's
/// UNIQUE constraint; this only rejects obviously malformed input.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => {
            return Err(ValidationError::InvalidFormat {
                field: "email".to_string(),
                reason: "must contain '@'".to_string(),
            })
        }
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like user@domain.tld".to_string(),
        });
    }

    Ok(())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.len() < 8 {
        return Err(ValidationError::OutOfRange {
            field: "password length".to_string(),
            min: 8,
            max: 128,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in the smallest currency unit.
///
/// Zero is allowed (free items); negative is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level. Quantity-on-hand is never negative.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Cart Validator
// =============================================================================

/// Validates a whole checkout cart before the store is touched.
///
/// ## Rules
/// - Must contain at least one line
/// - Must not exceed MAX_CART_LINES
/// - Every line quantity must pass [`validate_quantity`]
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    if lines.len() > MAX_CART_LINES {
        return Err(ValidationError::CartTooLarge {
            max: MAX_CART_LINES,
        });
    }

    for line in lines {
        validate_quantity(line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
