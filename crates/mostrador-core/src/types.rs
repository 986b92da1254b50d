//! # Domain Types
//!
//! Core domain types used throughout Mostrador.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Order (mesa)  │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price_cents    │   │  state          │   │  total_cents    │       │
//! │  │  stock_hundr.   │   │  total_cents    │   │  payment_method │       │
//! │  │  unit           │   │  OrderItem[]    │   │  SaleItem[]     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Expense      │   │   CashShift     │   │ Supplier /      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │ WorkSchedule    │       │
//! │  │  amount_cents   │   │  opened_at      │   │  back-office    │       │
//! │  │  category       │   │  closed_at?     │   │  directories    │       │
//! │  │  payment_method?│   │  balances       │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Conventions
//! - Every owned row carries `owner_id`; every query is scoped by it.
//! - Money fields end in `_cents`, quantity fields in `_hundredths`.
//! - Line items snapshot name, unit and price so catalog edits never rewrite
//!   history.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Unit of Measure
// =============================================================================

/// How a product is sold: by the piece or by weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    /// Discrete items. Quantities must be whole.
    #[default]
    Unit,
    /// Weight in kilograms, to 0.01 kg.
    Kg,
}

impl UnitOfMeasure {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Unit => "unit",
            UnitOfMeasure::Kg => "kg",
        }
    }

    /// Whether `quantity` has a granularity this unit can represent.
    pub const fn accepts(&self, quantity: Quantity) -> bool {
        match self {
            UnitOfMeasure::Unit => quantity.is_whole(),
            UnitOfMeasure::Kg => true,
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unit" | "unidad" => Ok(UnitOfMeasure::Unit),
            "kg" => Ok(UnitOfMeasure::Kg),
            _ => Err(ValidationError::NotAllowed {
                field: "unit".to_string(),
                allowed: vec!["unit".to_string(), "kg".to_string()],
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry with its current stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// User that owns this catalog row.
    pub owner_id: String,

    /// Display name shown at the counter.
    pub name: String,

    pub description: Option<String>,

    /// Price in cents per unit (or per kg).
    pub price_cents: i64,

    /// Current stock in hundredths of `unit`.
    pub stock_hundredths: i64,

    pub unit: UnitOfMeasure,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn stock(&self) -> Quantity {
        Quantity::from_hundredths(self.stock_hundredths)
    }

    /// Advisory stock check used when adding to a tab.
    ///
    /// The authoritative check happens at commit time inside the stock
    /// decrement itself.
    pub fn ensure_stock(&self, requested: Quantity) -> CoreResult<()> {
        if self.stock() < requested {
            return Err(CoreError::InsufficientStock {
                product: self.name.clone(),
                available: self.stock(),
                requested,
            });
        }
        Ok(())
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: Quantity,
    pub unit: UnitOfMeasure,
}

/// Partial update for a product. `None` leaves the field untouched.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Money>,
    pub stock: Option<Quantity>,
    pub unit: Option<UnitOfMeasure>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.unit.is_none()
    }
}

// =============================================================================
// Order (Mesa)
// =============================================================================

/// Lifecycle state of a tab.
///
/// ```text
///            open()               close()
///  closed ───────────► open ────────────────► closed
///    │                 │  ▲                   (items → sale)
///    │ delete()        │  │ add / remove item
///    ▼                 └──┘
///  removed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// Idle table; the initial state.
    #[default]
    Closed,
    /// Accumulating items.
    Open,
}

impl OrderState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderState::Closed => "closed",
            OrderState::Open => "open",
        }
    }
}

/// A running tab ("mesa").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub owner_id: String,
    /// Free text, e.g. "Mesa 4" or "Barra".
    pub label: String,
    pub state: OrderState,
    /// Always equals the sum of the items' line totals.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == OrderState::Open
    }

    /// Items can only change, and the tab can only be closed, while open.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if !self.is_open() {
            return Err(CoreError::OrderNotOpen {
                order_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// `open()` is only valid from `closed`.
    pub fn ensure_openable(&self) -> CoreResult<()> {
        if self.is_open() {
            return Err(CoreError::OrderAlreadyOpen {
                order_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// An open tab cannot be deleted.
    pub fn ensure_deletable(&self) -> CoreResult<()> {
        if self.is_open() {
            return Err(CoreError::OrderActive {
                order_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// A line on an open tab, with catalog data frozen at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub name_snapshot: String,
    pub quantity_hundredths: i64,
    pub unit_price_cents: i64,
    pub unit: UnitOfMeasure,
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_hundredths(self.quantity_hundredths)
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// The commit input this tab line turns into on close.
    pub fn to_sale_line(&self) -> SaleLine {
        SaleLine {
            product_id: self.product_id.clone(),
            quantity: self.quantity(),
            unit_price: self.unit_price(),
            unit: self.unit,
        }
    }
}

/// An order together with its current items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Immutable; deletion reverses its stock effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub owner_id: String,
    pub total_cents: i64,
    /// Free text as entered; arqueo classifies it into a bucket.
    pub payment_method: String,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    pub quantity_hundredths: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    pub unit: UnitOfMeasure,
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_hundredths(self.quantity_hundredths)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// A sale together with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleWithItems {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// One line handed to the Sale Committer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: Quantity,
    /// Price agreed at the counter (or captured on the tab).
    pub unit_price: Money,
    pub unit: UnitOfMeasure,
}

impl SaleLine {
    /// `unit_price × quantity`, rounded to the cent.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A dated outgoing payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub owner_id: String,
    #[ts(as = "String")]
    pub expense_date: NaiveDate,
    pub description: String,
    pub amount_cents: i64,
    /// Free-text tag. Doubles as payment method when none is recorded.
    pub category: Option<String>,
    pub payment_method: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// The string arqueo classifies: the payment method if present, else the
    /// category, else empty.
    pub fn bucket_source(&self) -> &str {
        self.payment_method
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or(self.category.as_deref())
            .unwrap_or("")
    }
}

/// Input for appending an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub expense_date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: Option<String>,
    pub payment_method: Option<String>,
}

// =============================================================================
// Cash Shift (Arqueo)
// =============================================================================

/// A cash-drawer accounting period.
///
/// Open while `closed_at` is `None`; at most one open shift per owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashShift {
    pub id: String,
    pub owner_id: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    pub opening_balance_cents: i64,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    pub closing_balance_cents: Option<i64>,
    pub comment: Option<String>,
}

impl CashShift {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_cents(self.opening_balance_cents)
    }

    #[inline]
    pub fn closing_balance(&self) -> Option<Money> {
        self.closing_balance_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Work Schedule
// =============================================================================

/// One shift worked (or planned) by an employee on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct WorkSchedule {
    pub id: String,
    pub owner_id: String,
    pub employee: String,
    #[ts(as = "String")]
    pub work_date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkSchedule {
    pub employee: String,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(state: OrderState) -> Order {
        let now = Utc::now();
        Order {
            id: "m1".into(),
            owner_id: "owner".into(),
            label: "Mesa 1".into(),
            state,
            total_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("unit".parse::<UnitOfMeasure>().unwrap(), UnitOfMeasure::Unit);
        assert_eq!(" KG ".parse::<UnitOfMeasure>().unwrap(), UnitOfMeasure::Kg);
        assert!("litre".parse::<UnitOfMeasure>().is_err());
    }

    #[test]
    fn test_unit_granularity() {
        assert!(UnitOfMeasure::Unit.accepts(Quantity::from_units(2)));
        assert!(!UnitOfMeasure::Unit.accepts(Quantity::from_hundredths(150)));
        assert!(UnitOfMeasure::Kg.accepts(Quantity::from_hundredths(35)));
    }

    #[test]
    fn test_order_state_guards() {
        let closed = order(OrderState::Closed);
        assert!(closed.ensure_openable().is_ok());
        assert!(closed.ensure_deletable().is_ok());
        assert!(matches!(
            closed.ensure_open(),
            Err(CoreError::OrderNotOpen { .. })
        ));

        let open = order(OrderState::Open);
        assert!(open.ensure_open().is_ok());
        assert!(matches!(
            open.ensure_openable(),
            Err(CoreError::OrderAlreadyOpen { .. })
        ));
        assert!(matches!(
            open.ensure_deletable(),
            Err(CoreError::OrderActive { .. })
        ));
    }

    #[test]
    fn test_expense_bucket_source_prefers_payment_method() {
        let mut expense = Expense {
            id: "e1".into(),
            owner_id: "owner".into(),
            expense_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            description: "Hielo".into(),
            amount_cents: 500,
            category: Some("insumos".into()),
            payment_method: Some("efectivo".into()),
            created_at: Utc::now(),
        };
        assert_eq!(expense.bucket_source(), "efectivo");

        expense.payment_method = Some("  ".into());
        assert_eq!(expense.bucket_source(), "insumos");

        expense.category = None;
        expense.payment_method = None;
        assert_eq!(expense.bucket_source(), "");
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderState::Open).unwrap(), "\"open\"");
        assert_eq!(serde_json::to_string(&UnitOfMeasure::Kg).unwrap(), "\"kg\"");
    }
}
