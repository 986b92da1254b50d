//! # mostrador-core: Pure Business Logic for Mostrador
//!
//! This crate holds the domain of the shop back office as pure functions
//! and plain data. It never touches the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mostrador Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI (external collaborator)                   │   │
//! │  │   Catalog ──► Mesas ──► Counter sale ──► Expenses ──► Arqueo    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 backoffice commands (owner-scoped)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ mostrador-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │  money   │ │ checkout │ │reconcile │          │   │
//! │  │   │ Product  │ │  Money   │ │  totals  │ │ buckets  │          │   │
//! │  │   │  Order   │ │ Quantity │ │  checks  │ │ preview  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            mostrador-db (SQLite, Sale Committer)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Sale, Expense, CashShift, ...)
//! - [`money`] - Money in integer cents
//! - [`quantity`] - Quantities in integer hundredths
//! - [`checkout`] - Commit pre-flight: line totals and the total check
//! - [`reconcile`] - Arqueo buckets, preview and close report
//! - [`schedule`] - Hours worked per employee
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mostrador_core::{Money, Quantity, SaleLine, UnitOfMeasure};
//! use mostrador_core::checkout::prepare_commit;
//!
//! let lines = vec![SaleLine {
//!     product_id: "cafe".into(),
//!     quantity: Quantity::from_units(2),
//!     unit_price: Money::from_cents(1200),
//!     unit: UnitOfMeasure::Unit,
//! }];
//!
//! let plan = prepare_commit(Money::from_cents(2400), "efectivo", &lines).unwrap();
//! assert_eq!(plan.total.cents(), 2400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod quantity;
pub mod reconcile;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use quantity::Quantity;
pub use reconcile::{BucketTotals, PaymentBucket, ShiftCloseReport, ShiftPreview};
pub use schedule::EmployeeHours;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line, in whole units (or kg).
///
/// ## Business Reason
/// Catches typos like 1000 instead of 10 before they reach stock.
pub const MAX_ITEM_QUANTITY: i64 = 999;
