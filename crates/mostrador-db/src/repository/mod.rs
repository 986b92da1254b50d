//! # Repository Module
//!
//! Database repository implementations for Mostrador.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  backoffice command                                                     │
//! │       │  db.orders().close(owner, order_id, "efectivo")                 │
//! │       ▼                                                                 │
//! │  OrderRepository ──(same transaction)──► sale::commit_lines()           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Rule
//! Every method takes `owner_id` and every statement filters on it. A row
//! owned by someone else is indistinguishable from a missing row.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD
//! - [`order::OrderRepository`] - Mesas and their items
//! - [`sale::SaleRepository`] - Commit, reversal, history
//! - [`expense::ExpenseRepository`] - Expense ledger
//! - [`shift::ShiftRepository`] - Cash shifts and arqueo preview
//! - [`supplier::SupplierRepository`] - Supplier directory
//! - [`schedule::ScheduleRepository`] - Staff schedules

pub mod expense;
pub mod order;
pub mod product;
pub mod sale;
pub mod schedule;
pub mod shift;
pub mod supplier;

#[cfg(test)]
pub(crate) mod test_support {
    use mostrador_core::{Money, NewProduct, Product, Quantity, UnitOfMeasure};

    use crate::pool::{Database, DbConfig};

    pub const OWNER: &str = "owner-a";
    pub const OTHER_OWNER: &str = "owner-b";

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn product(db: &Database, name: &str, price_cents: i64, stock_units: i64) -> Product {
        db.products()
            .create(
                OWNER,
                NewProduct {
                    name: name.to_string(),
                    description: None,
                    price: Money::from_cents(price_cents),
                    stock: Quantity::from_units(stock_units),
                    unit: UnitOfMeasure::Unit,
                },
            )
            .await
            .unwrap()
    }

    pub async fn weighed_product(
        db: &Database,
        name: &str,
        price_cents: i64,
        stock_hundredths: i64,
    ) -> Product {
        db.products()
            .create(
                OWNER,
                NewProduct {
                    name: name.to_string(),
                    description: None,
                    price: Money::from_cents(price_cents),
                    stock: Quantity::from_hundredths(stock_hundredths),
                    unit: UnitOfMeasure::Kg,
                },
            )
            .await
            .unwrap()
    }
}
