//! # Checkout
//!
//! Pure pre-flight for the Sale Committer: everything that can be decided
//! before touching the database.
//!
//! ```text
//! commit(total, payment_method, lines)
//!      │
//!      ▼
//! prepare_commit()  ← THIS MODULE
//!      ├── lines empty?              → Validation("lines is required")
//!      ├── line quantity / price bad → Validation
//!      ├── payment method blank      → Validation
//!      ├── Σ line totals overflows   → Validation(OutOfRange)
//!      └── Σ line totals ≠ total     → Integrity(TotalMismatch)
//!      │
//!      ▼
//! CommitPlan { total, payment_method }   → mostrador-db transaction
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::SaleLine;
use crate::validation::{validate_line_quantity, validate_payment_method, validate_price};

/// A validated commit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    /// Equals the sum of the line totals.
    pub total: Money,
    /// Trimmed, as it will be stored.
    pub payment_method: String,
}

/// Sum of `unit_price × quantity` over all lines.
///
/// Fails with `OutOfRange` if the sum does not fit in `i64` cents.
pub fn lines_total(lines: &[SaleLine]) -> CoreResult<Money> {
    lines
        .iter()
        .try_fold(Money::zero(), |acc, line| acc.checked_add(line.line_total()))
        .ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "total".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into()
        })
}

/// Validates each line on its own.
pub fn validate_lines(lines: &[SaleLine]) -> CoreResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        }
        .into());
    }

    for line in lines {
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            }
            .into());
        }
        validate_line_quantity(line.quantity, line.unit)?;
        validate_price(line.unit_price)?;
    }

    Ok(())
}

/// Checks the declared total against the lines.
pub fn verify_total(declared: Money, lines: &[SaleLine]) -> CoreResult<Money> {
    let computed = lines_total(lines)?;
    if computed != declared {
        return Err(CoreError::TotalMismatch { declared, computed });
    }
    Ok(computed)
}

/// Full pre-flight for a commit. Nothing is written if this fails.
pub fn prepare_commit(
    declared_total: Money,
    payment_method: &str,
    lines: &[SaleLine],
) -> CoreResult<CommitPlan> {
    validate_lines(lines)?;
    let payment_method = validate_payment_method(payment_method)?;
    let total = verify_total(declared_total, lines)?;

    Ok(CommitPlan {
        total,
        payment_method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::quantity::Quantity;
    use crate::types::UnitOfMeasure;
    use proptest::prelude::*;

    fn line(product: &str, hundredths: i64, price_cents: i64, unit: UnitOfMeasure) -> SaleLine {
        SaleLine {
            product_id: product.to_string(),
            quantity: Quantity::from_hundredths(hundredths),
            unit_price: Money::from_cents(price_cents),
            unit,
        }
    }

    #[test]
    fn test_matching_total_is_accepted() {
        let lines = vec![
            line("a", 200, 1000, UnitOfMeasure::Unit),
            line("b", 100, 500, UnitOfMeasure::Unit),
        ];
        let plan = prepare_commit(Money::from_cents(2500), " Efectivo ", &lines).unwrap();
        assert_eq!(plan.total.cents(), 2500);
        assert_eq!(plan.payment_method, "Efectivo");
    }

    #[test]
    fn test_mismatched_total_is_integrity_error() {
        let lines = vec![
            line("a", 200, 1000, UnitOfMeasure::Unit),
            line("b", 100, 500, UnitOfMeasure::Unit),
        ];
        let err = prepare_commit(Money::from_cents(2400), "efectivo", &lines).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(matches!(
            err,
            CoreError::TotalMismatch { declared, computed }
                if declared.cents() == 2400 && computed.cents() == 2500
        ));
    }

    #[test]
    fn test_empty_lines_rejected() {
        let err = prepare_commit(Money::zero(), "efectivo", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_blank_payment_method_rejected() {
        let lines = vec![line("a", 100, 100, UnitOfMeasure::Unit)];
        let err = prepare_commit(Money::from_cents(100), "  ", &lines).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_fractional_unit_line_rejected() {
        let lines = vec![line("a", 150, 100, UnitOfMeasure::Unit)];
        let err = prepare_commit(Money::from_cents(150), "efectivo", &lines).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_weighted_line_total_rounds_per_line() {
        // 0.37 kg × $10.99 → $4.07 ; 0.37 kg × $10.99 → $4.07
        let lines = vec![
            line("queso", 37, 1099, UnitOfMeasure::Kg),
            line("queso", 37, 1099, UnitOfMeasure::Kg),
        ];
        assert_eq!(lines_total(&lines).unwrap().cents(), 814);
        assert!(prepare_commit(Money::from_cents(814), "tarjeta", &lines).is_ok());
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let price = Money::try_from_major(1e13, "price").unwrap();
        let lines: Vec<SaleLine> = (0..10)
            .map(|_| SaleLine {
                product_id: "p".to_string(),
                quantity: Quantity::from_units(999),
                unit_price: price,
                unit: UnitOfMeasure::Unit,
            })
            .collect();

        let err = prepare_commit(Money::from_cents(1), "efectivo", &lines).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "total"
        ));
    }

    proptest! {
        /// The total computed from the lines always passes its own check.
        #[test]
        fn computed_total_always_verifies(
            raw in prop::collection::vec((1i64..50_000, 0i64..100_000), 1..20)
        ) {
            let lines: Vec<SaleLine> = raw
                .iter()
                .map(|(q, p)| line("p", *q, *p, UnitOfMeasure::Kg))
                .collect();
            let total = lines_total(&lines).unwrap();
            prop_assert!(verify_total(total, &lines).is_ok());
            prop_assert!(verify_total(total + Money::from_cents(1), &lines).is_err());
        }
    }
}
