//! # Shift Reconciliation (Arqueo)
//!
//! Pure aggregation of a shift window's sales and expenses by payment
//! method.
//!
//! ## The Arqueo Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  window = [opened_at, now]   (inclusive, owner-scoped)                  │
//! │                                                                         │
//! │  sales    ──► classify(payment_method) ──► BucketTotals                 │
//! │  expenses ──► classify(method | category) ──► BucketTotals              │
//! │                                                                         │
//! │  net           = sales.total - expenses.total                           │
//! │  expected_cash = opening_balance + sales.cash - expenses.cash           │
//! │  discrepancy   = closing_balance - expected_cash   (on close only)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use mostrador_core::money::Money;
//! use mostrador_core::reconcile::{PaymentBucket, BucketTotals};
//!
//! assert_eq!(PaymentBucket::classify(" Efectivo "), PaymentBucket::Cash);
//! assert_eq!(PaymentBucket::classify("Mercado Pago"), PaymentBucket::Qr);
//!
//! let totals = BucketTotals::from_entries([
//!     ("efectivo", Money::from_cents(300)),
//!     ("tarjeta", Money::from_cents(150)),
//! ]);
//! assert_eq!(totals.cash.cents(), 300);
//! assert_eq!(totals.total.cents(), 450);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::CashShift;

// =============================================================================
// Payment Bucket
// =============================================================================

/// Canonical payment-method aggregation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentBucket {
    Cash,
    Card,
    Transfer,
    /// QR codes and wallets.
    Qr,
    Other,
}

impl PaymentBucket {
    /// Classifies a free-text payment method. Case and surrounding
    /// whitespace are ignored; unknown and empty strings are `Other`.
    pub fn classify(method: &str) -> PaymentBucket {
        match method.trim().to_lowercase().as_str() {
            "efectivo" | "cash" => PaymentBucket::Cash,
            "tarjeta" | "card" | "debito" | "credito" => PaymentBucket::Card,
            "transferencia" | "transfer" => PaymentBucket::Transfer,
            "qr" | "mercado pago" | "mercadopago" => PaymentBucket::Qr,
            _ => PaymentBucket::Other,
        }
    }
}

// =============================================================================
// Bucket Totals
// =============================================================================

/// Amounts per bucket. `total` always equals the sum of the five buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BucketTotals {
    pub cash: Money,
    pub card: Money,
    pub transfer: Money,
    pub qr: Money,
    pub other: Money,
    pub total: Money,
}

impl BucketTotals {
    pub fn add(&mut self, method: &str, amount: Money) {
        let slot = match PaymentBucket::classify(method) {
            PaymentBucket::Cash => &mut self.cash,
            PaymentBucket::Card => &mut self.card,
            PaymentBucket::Transfer => &mut self.transfer,
            PaymentBucket::Qr => &mut self.qr,
            PaymentBucket::Other => &mut self.other,
        };
        *slot += amount;
        self.total += amount;
    }

    pub fn from_entries<'a, I>(entries: I) -> BucketTotals
    where
        I: IntoIterator<Item = (&'a str, Money)>,
    {
        let mut totals = BucketTotals::default();
        for (method, amount) in entries {
            totals.add(method, amount);
        }
        totals
    }

    pub fn get(&self, bucket: PaymentBucket) -> Money {
        match bucket {
            PaymentBucket::Cash => self.cash,
            PaymentBucket::Card => self.card,
            PaymentBucket::Transfer => self.transfer,
            PaymentBucket::Qr => self.qr,
            PaymentBucket::Other => self.other,
        }
    }
}

// =============================================================================
// Preview & Close Report
// =============================================================================

/// Live view of an open shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftPreview {
    pub shift_id: String,
    #[ts(as = "String")]
    pub window_start: DateTime<Utc>,
    #[ts(as = "String")]
    pub window_end: DateTime<Utc>,
    pub opening_balance: Money,
    pub sales: BucketTotals,
    pub expenses: BucketTotals,
    pub net: Money,
    pub expected_cash: Money,
}

impl ShiftPreview {
    /// Aggregates the window's sales and expenses for `shift`.
    ///
    /// Entries are `(payment method or category, amount)` pairs already
    /// filtered to the window by the caller.
    pub fn compute<'a, S, E>(
        shift: &CashShift,
        window_end: DateTime<Utc>,
        sales: S,
        expenses: E,
    ) -> ShiftPreview
    where
        S: IntoIterator<Item = (&'a str, Money)>,
        E: IntoIterator<Item = (&'a str, Money)>,
    {
        let sales = BucketTotals::from_entries(sales);
        let expenses = BucketTotals::from_entries(expenses);
        let opening_balance = shift.opening_balance();

        ShiftPreview {
            shift_id: shift.id.clone(),
            window_start: shift.opened_at,
            window_end,
            opening_balance,
            net: sales.total - expenses.total,
            expected_cash: opening_balance + sales.cash - expenses.cash,
            sales,
            expenses,
        }
    }
}

/// Result of closing a shift: the stored shift, the final preview, and how
/// far the counted drawer is from what was expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftCloseReport {
    pub shift: CashShift,
    pub preview: ShiftPreview,
    /// `closing_balance - expected_cash`. Positive means surplus.
    pub discrepancy: Money,
}

impl ShiftCloseReport {
    pub fn new(shift: CashShift, preview: ShiftPreview) -> ShiftCloseReport {
        let counted = shift.closing_balance().unwrap_or_default();
        let discrepancy = counted - preview.expected_cash;
        ShiftCloseReport {
            shift,
            preview,
            discrepancy,
        }
    }
}
