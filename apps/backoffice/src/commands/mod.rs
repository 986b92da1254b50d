//! # Commands Module
//!
//! Every operation the back-office UI can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports + argument conversion)
//! ├── product.rs   ◄─── list / get / create / update / delete
//! ├── order.rs     ◄─── mesas: create, open, add/remove item, close, delete
//! ├── sale.rs      ◄─── commit, delete (reverse), history
//! ├── expense.rs   ◄─── list / add / delete
//! ├── shift.rs     ◄─── arqueo: open, preview, close
//! ├── supplier.rs  ◄─── list / add / delete
//! └── schedule.rs  ◄─── list / add / delete / hours by employee
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI                                                                     │
//! │  commit_sale({ total: 25.0, paymentMethod: "efectivo", lines })         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  pub async fn commit_sale(                                              │
//! │      db: &DbState,          ◄── shared pool                            │
//! │      session: &Session,     ◄── owner scope                            │
//! │      total: f64, ...        ◄── converted here to Money / Quantity     │
//! │  ) -> Result<SaleDto, ApiError>                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  UI receives camelCase JSON with integer cents / hundredths            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod expense;
pub mod order;
pub mod product;
pub mod sale;
pub mod schedule;
pub mod shift;
pub mod supplier;

use chrono::{NaiveDate, NaiveTime};

use crate::error::ApiError;
use mostrador_core::validation::validate_id;
use mostrador_core::{Money, Quantity, ValidationError};

/// UI amount in major units → Money. Rejects NaN and infinities.
pub(crate) fn money_arg(value: f64, field: &str) -> Result<Money, ApiError> {
    Ok(Money::try_from_major(value, field)?)
}

/// UI quantity → Quantity. At most two decimals.
pub(crate) fn quantity_arg(value: f64, field: &str) -> Result<Quantity, ApiError> {
    Ok(Quantity::try_from_f64(value, field)?)
}

/// Checks an id is a UUID and returns it trimmed.
pub(crate) fn id_arg<'a>(field: &str, id: &'a str) -> Result<&'a str, ApiError> {
    validate_id(field, id)?;
    Ok(id.trim())
}

/// `YYYY-MM-DD`.
pub(crate) fn date_arg(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
        .into()
    })
}

/// `HH:MM` or `HH:MM:SS`.
pub(crate) fn time_arg(field: &str, value: &str) -> Result<NaiveTime, ApiError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "expected HH:MM".to_string(),
            }
            .into()
        })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_money_arg() {
        assert_eq!(money_arg(10.99, "price").unwrap().cents(), 1099);
        assert_eq!(money_arg(f64::NAN, "price").unwrap_err().code, ErrorCode::ValidationError);
        assert!(money_arg(f64::INFINITY, "price").is_err());
    }

    #[test]
    fn test_quantity_arg() {
        assert_eq!(quantity_arg(0.35, "quantity").unwrap().hundredths(), 35);
        assert!(quantity_arg(0.355, "quantity").is_err());
    }

    #[test]
    fn test_id_arg() {
        let id = uuid::Uuid::new_v4().to_string();
        assert_eq!(id_arg("id", &format!(" {} ", id)).unwrap(), id);
        assert!(id_arg("id", "mesa-1").is_err());
    }

    #[test]
    fn test_date_and_time_args() {
        assert_eq!(
            date_arg("workDate", "2024-06-03").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
        assert!(date_arg("workDate", "03/06/2024").is_err());
        assert_eq!(
            time_arg("startTime", "08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            time_arg("endTime", "17:45:10").unwrap(),
            NaiveTime::from_hms_opt(17, 45, 10).unwrap()
        );
        assert!(time_arg("endTime", "25:00").is_err());
    }
}
