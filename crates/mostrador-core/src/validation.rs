//! # Validation Module
//!
//! Input validation for every back-office operation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command boundary (backoffice)                                │
//! │  ├── UI numbers → Money / Quantity (rejects NaN, infinities)           │
//! │  └── Session owner resolution                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names, labels, descriptions                                       │
//! │  └── Prices, amounts, quantities vs. unit of measure                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock_hundredths >= 0), CHECK (amount_cents > 0)           │
//! │  ├── UNIQUE open shift per owner                                       │
//! │  └── Foreign keys (ON DELETE RESTRICT on products)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::quantity::Quantity;
//! use mostrador_core::types::UnitOfMeasure;
//! use mostrador_core::validation::{validate_line_quantity, validate_product_name};
//!
//! validate_product_name("Cafe con leche").unwrap();
//! validate_line_quantity(Quantity::from_hundredths(35), UnitOfMeasure::Kg).unwrap();
//! assert!(validate_line_quantity(Quantity::from_hundredths(150), UnitOfMeasure::Unit).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::UnitOfMeasure;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_LABEL_LEN: usize = 100;
const MAX_TEXT_LEN: usize = 500;
const MAX_PAYMENT_METHOD_LEN: usize = 50;

/// Largest unit price in cents. `MAX_PRICE_CENTS × MAX_ITEM_QUANTITY` fits in `i64`.
const MAX_PRICE_CENTS: i64 = 1_000_000_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Checks a required string and returns it trimmed.
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional string. Blank becomes `None`.
pub fn validate_optional(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ```rust
/// use mostrador_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Medialuna").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_required("name", name, MAX_NAME_LEN)
}

pub fn validate_description(description: Option<&str>) -> ValidationResult<Option<String>> {
    validate_optional("description", description, MAX_TEXT_LEN)
}

/// Validates an order label ("Mesa 4", "Barra").
pub fn validate_order_label(label: &str) -> ValidationResult<String> {
    validate_required("label", label, MAX_LABEL_LEN)
}

/// Payment method is free text but must be present.
pub fn validate_payment_method(method: &str) -> ValidationResult<String> {
    validate_required("payment_method", method, MAX_PAYMENT_METHOD_LEN)
}

pub fn validate_expense_description(description: &str) -> ValidationResult<String> {
    validate_required("description", description, MAX_TEXT_LEN)
}

pub fn validate_comment(comment: Option<&str>) -> ValidationResult<Option<String>> {
    validate_optional("comment", comment, MAX_TEXT_LEN)
}

pub fn validate_supplier_name(name: &str) -> ValidationResult<String> {
    validate_required("name", name, MAX_NAME_LEN)
}

pub fn validate_employee(employee: &str) -> ValidationResult<String> {
    validate_required("employee", employee, MAX_LABEL_LEN)
}

/// Optional short text such as a category, phone or contact person.
pub fn validate_short_text(field: &str, value: Option<&str>) -> ValidationResult<Option<String>> {
    validate_optional(field, value, MAX_NAME_LEN)
}

/// Optional free-form note.
pub fn validate_note(field: &str, value: Option<&str>) -> ValidationResult<Option<String>> {
    validate_optional(field, value, MAX_TEXT_LEN)
}

/// Optional email: blank is fine, otherwise needs an `@` with text on both
/// sides.
pub fn validate_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let email = validate_optional("email", email, MAX_NAME_LEN)?;
    if let Some(ref e) = email {
        let valid = e
            .split_once('@')
            .map(|(user, domain)| !user.is_empty() && !domain.is_empty())
            .unwrap_or(false);
        if !valid {
            return Err(ValidationError::InvalidFormat {
                field: "email".to_string(),
                reason: "must look like name@domain".to_string(),
            });
        }
    }
    Ok(email)
}

/// Validates a UUID identifier coming from the UI.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (courtesy items)
/// - At most 10^13 in major units
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a stock level for a product's unit of measure.
///
/// Zero is allowed; negative never is.
pub fn validate_stock(stock: Quantity, unit: UnitOfMeasure) -> ValidationResult<()> {
    if stock.is_negative() {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    validate_granularity("stock", stock, unit)
}

/// Validates a quantity on an order or sale line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`] units
/// - `unit` products need whole quantities; `kg` accepts 0.01 steps
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Mesa: Add Item                                                         │
/// │                                                                         │
/// │  User enters quantity: 1.5 of "Empanada" (unit)                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_line_quantity(150, Unit) ← THIS FUNCTION                      │
/// │       │                                                                 │
/// │       ├── qty <= 0?        → "quantity must be positive"                │
/// │       ├── qty > 999 units? → "quantity must be between 0.01 and 999"    │
/// │       └── fractional unit? → "quantity has invalid format"  ◄── here    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_line_quantity(quantity: Quantity, unit: UnitOfMeasure) -> ValidationResult<()> {
    if !quantity.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > Quantity::from_units(MAX_ITEM_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }

    validate_granularity("quantity", quantity, unit)
}

fn validate_granularity(field: &str, quantity: Quantity, unit: UnitOfMeasure) -> ValidationResult<()> {
    if !unit.accepts(quantity) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("{} products need whole quantities", unit),
        });
    }
    Ok(())
}

/// Expense amounts must be strictly positive.
pub fn validate_expense_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

/// Declared drawer balances (opening or counted closing) cannot be negative.
pub fn validate_balance(field: &str, balance: Money) -> ValidationResult<()> {
    if balance.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(MAX_PRICE_CENTS)).is_ok());
        assert!(matches!(
            validate_price(Money::from_cents(MAX_PRICE_CENTS + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_price(Money::from_cents(-1)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("  Cafe  ").unwrap(), "Cafe");
        assert!(matches!(
            validate_product_name(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_product_name(&"x".repeat(201)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
        assert!(validate_product_name(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_optional_blank_is_none() {
        assert_eq!(validate_description(Some("   ")).unwrap(), None);
        assert_eq!(validate_description(None).unwrap(), None);
        assert_eq!(
            validate_description(Some(" dulce ")).unwrap(),
            Some("dulce".to_string())
        );
    }

    #[test]
    fn test_short_text_and_note_limits() {
        assert_eq!(validate_short_text("phone", Some("")).unwrap(), None);
        assert!(validate_short_text("phone", Some(&"9".repeat(201))).is_err());
        assert!(validate_note("notes", Some(&"n".repeat(500))).is_ok());
        assert!(matches!(
            validate_note("notes", Some(&"n".repeat(501))),
            Err(ValidationError::TooLong { max: 500, .. })
        ));
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(Quantity::from_units(1), UnitOfMeasure::Unit).is_ok());
        assert!(validate_line_quantity(Quantity::from_units(999), UnitOfMeasure::Unit).is_ok());
        assert!(validate_line_quantity(Quantity::from_hundredths(1), UnitOfMeasure::Kg).is_ok());

        assert!(matches!(
            validate_line_quantity(Quantity::zero(), UnitOfMeasure::Kg),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_line_quantity(Quantity::from_units(1000), UnitOfMeasure::Unit),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_line_quantity(Quantity::from_hundredths(150), UnitOfMeasure::Unit),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(Quantity::zero(), UnitOfMeasure::Unit).is_ok());
        assert!(validate_stock(Quantity::from_hundredths(1025), UnitOfMeasure::Kg).is_ok());
        assert!(validate_stock(Quantity::from_hundredths(-1), UnitOfMeasure::Kg).is_err());
        assert!(validate_stock(Quantity::from_hundredths(250), UnitOfMeasure::Unit).is_err());
    }

    #[test]
    fn test_validate_money_rules() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
        assert!(validate_expense_amount(Money::zero()).is_err());
        assert!(validate_expense_amount(Money::from_cents(-100)).is_err());
        assert!(validate_expense_amount(Money::from_cents(1)).is_ok());
        assert!(validate_balance("opening_balance", Money::zero()).is_ok());
        assert!(validate_balance("opening_balance", Money::from_cents(-5)).is_err());
    }

    #[test]
    fn test_validate_payment_method() {
        assert_eq!(validate_payment_method(" Efectivo ").unwrap(), "Efectivo");
        assert!(validate_payment_method("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(None).unwrap().is_none());
        assert!(validate_email(Some("ventas@molino.com")).is_ok());
        assert!(validate_email(Some("molino.com")).is_err());
        assert!(validate_email(Some("@molino.com")).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("id", &uuid::Uuid::new_v4().to_string()).is_ok());
        assert!(validate_id("id", "not-a-uuid").is_err());
    }
}
