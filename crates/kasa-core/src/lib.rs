//! # kasa-core: Pure Business Logic for the Kasa POS Backend
//!
//! This crate is the heart of the system. It contains domain types and
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Transaction, CartLine, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in the smallest currency unit (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use kasa_core::money::Money;
//!
//! // Prices never come from floats.
//! let price = Money::from_cents(2500);
//!
//! // Line subtotal = price x quantity, overflow-checked.
//! let subtotal = price.checked_mul(4).unwrap();
//! assert_eq!(subtotal.cents(), 10000);
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single checkout cart.
///
/// Prevents runaway carts and keeps transaction sizes reasonable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single item in a cart line.
///
/// Guards against accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Name reported by the daily summary when no item was sold today.
pub const NO_BEST_SELLER: &str = "-";
