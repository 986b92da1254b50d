//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mostrador-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Machine-readable classification                │
//! │                                                                         │
//! │  mostrador-db errors (separate crate)                                  │
//! │  └── DbError          - Database failures, wraps CoreError             │
//! │                                                                         │
//! │  backoffice errors (in app)                                            │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Kinds
//! Every `CoreError` maps to exactly one [`ErrorKind`] so callers can branch:
//! re-prompt on `Validation`, refresh-and-retry on `Conflict`, report a bug
//! on `Integrity`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a domain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Referenced entity is missing or belongs to another owner.
    NotFound,
    /// Operation not permitted in the current state.
    Conflict,
    /// Internal consistency check failed (caller or computation bug).
    Integrity,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product does not exist for this owner.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order (mesa) does not exist for this owner.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Sale does not exist for this owner (or was already deleted).
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Any other owned entity (order item, expense, supplier, schedule).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The owner has no open cash shift.
    #[error("No open cash shift")]
    NoOpenShift,

    /// Not enough stock to cover the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to tab / commit sale (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Cafe", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Cafe in stock"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Items can only be added/removed and closed while the order is open.
    #[error("Order {order_id} is not open")]
    OrderNotOpen { order_id: String },

    /// `open()` on an order that is already open.
    #[error("Order {order_id} is already open")]
    OrderAlreadyOpen { order_id: String },

    /// Open orders cannot be deleted.
    #[error("Order {order_id} is active and cannot be deleted")]
    OrderActive { order_id: String },

    /// A second shift was opened while one is still open.
    #[error("A cash shift is already open")]
    ShiftAlreadyOpen,

    /// Product is referenced by order or sale lines.
    #[error("Product {product_id} is referenced by existing sales or orders")]
    ProductInUse { product_id: String },

    /// Declared sale total does not match the sum of its lines.
    #[error("Total mismatch: declared {declared}, computed {computed}")]
    TotalMismatch { declared: Money, computed: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_)
            | CoreError::OrderNotFound(_)
            | CoreError::SaleNotFound(_)
            | CoreError::NotFound { .. }
            | CoreError::NoOpenShift => ErrorKind::NotFound,

            CoreError::InsufficientStock { .. }
            | CoreError::OrderNotOpen { .. }
            | CoreError::OrderAlreadyOpen { .. }
            | CoreError::OrderActive { .. }
            | CoreError::ShiftAlreadyOpen
            | CoreError::ProductInUse { .. } => ErrorKind::Conflict,

            CoreError::TotalMismatch { .. } => ErrorKind::Integrity,

            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any transaction starts.
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, fractional units, NaN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Cafe".to_string(),
            available: Quantity::from_units(3),
            requested: Quantity::from_units(5),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Cafe: available 3, requested 5"
        );

        let err = CoreError::TotalMismatch {
            declared: Money::from_cents(2400),
            computed: Money::from_cents(2500),
        };
        assert_eq!(
            err.to_string(),
            "Total mismatch: declared $24.00, computed $25.00"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CoreError::NoOpenShift.kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::ShiftAlreadyOpen.kind(), ErrorKind::Conflict);
        assert_eq!(
            CoreError::OrderActive {
                order_id: "m1".into()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CoreError::TotalMismatch {
                declared: Money::zero(),
                computed: Money::from_cents(1),
            }
            .kind(),
            ErrorKind::Integrity
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }
}
