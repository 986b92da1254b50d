//! # Shift Repository
//!
//! Shift Reconciler (arqueo): open a cash shift, preview it, close it.
//!
//! ## Per-Owner State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   none ──open(opening_balance)──► shift open ──close(counted, note)──►  │
//! │    ▲                                  │                          none   │
//! │    │                                  └── preview()  (read only)        │
//! │    └── a second open() hits UNIQUE(owner_id) WHERE closed_at IS NULL    │
//! │        → ShiftAlreadyOpen                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Window
//! A shift covers `[opened_at, now]` (preview) or `[opened_at, closed_at]`
//! (close report), both ends inclusive. Sales fall in by `sold_at`,
//! expenses by the moment they were recorded (`created_at`).

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mostrador_core::validation::{validate_balance, validate_comment};
use mostrador_core::{CashShift, CoreError, Money, ShiftCloseReport, ShiftPreview};

/// Repository for cash shift operations.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// The owner's open shift, if any.
    pub async fn get_open(&self, owner_id: &str) -> DbResult<Option<CashShift>> {
        let mut conn = self.pool.acquire().await?;
        fetch_open(&mut conn, owner_id).await
    }

    /// Opens a shift with a declared opening balance.
    ///
    /// ## Errors
    /// * `Validation` - negative opening balance
    /// * `ShiftAlreadyOpen` - the owner already has an open shift
    pub async fn open(&self, owner_id: &str, opening_balance: Money) -> DbResult<CashShift> {
        validate_balance("opening_balance", opening_balance)?;

        let shift = CashShift {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            opened_at: Utc::now(),
            opening_balance_cents: opening_balance.cents(),
            closed_at: None,
            closing_balance_cents: None,
            comment: None,
        };

        debug!(owner_id = %owner_id, opening = %opening_balance, "Opening cash shift");

        sqlx::query(
            r#"
            INSERT INTO cash_shifts (id, owner_id, opened_at, opening_balance_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.owner_id)
        .bind(shift.opened_at)
        .bind(shift.opening_balance_cents)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                warn!(owner_id = %owner_id, "Cash shift already open");
                DbError::Domain(CoreError::ShiftAlreadyOpen)
            }
            other => other,
        })?;

        info!(shift_id = %shift.id, opening = %opening_balance, "Cash shift opened");
        Ok(shift)
    }

    /// Aggregates the open shift's window up to now.
    pub async fn preview(&self, owner_id: &str) -> DbResult<ShiftPreview> {
        let mut conn = self.pool.acquire().await?;

        let shift = fetch_open(&mut conn, owner_id)
            .await?
            .ok_or(CoreError::NoOpenShift)?;

        compute_preview(&mut conn, &shift, Utc::now()).await
    }

    /// Closes the open shift with the counted drawer balance.
    ///
    /// The report's preview is computed in the same transaction, over
    /// `[opened_at, closed_at]`. The discrepancy is reported, not stored.
    pub async fn close(
        &self,
        owner_id: &str,
        closing_balance: Money,
        comment: Option<&str>,
    ) -> DbResult<ShiftCloseReport> {
        validate_balance("closing_balance", closing_balance)?;
        let comment = validate_comment(comment)?;

        debug!(owner_id = %owner_id, closing = %closing_balance, "Closing cash shift");

        let mut tx = self.pool.begin().await?;

        let shift = sqlx::query_as::<_, CashShift>(
            r#"
            UPDATE cash_shifts SET
                closed_at = ?1,
                closing_balance_cents = ?2,
                comment = ?3
            WHERE owner_id = ?4 AND closed_at IS NULL
            RETURNING id, owner_id, opened_at, opening_balance_cents,
                      closed_at, closing_balance_cents, comment
            "#,
        )
        .bind(Utc::now())
        .bind(closing_balance.cents())
        .bind(&comment)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(shift) = shift else {
            warn!(owner_id = %owner_id, "No open cash shift to close");
            return Err(CoreError::NoOpenShift.into());
        };

        let window_end = shift.closed_at.unwrap_or_else(Utc::now);
        let preview = compute_preview(&mut tx, &shift, window_end).await?;

        tx.commit().await?;

        let report = ShiftCloseReport::new(shift, preview);
        info!(
            shift_id = %report.shift.id,
            expected_cash = %report.preview.expected_cash,
            counted = %closing_balance,
            discrepancy = %report.discrepancy,
            "Cash shift closed"
        );
        Ok(report)
    }
}

async fn fetch_open(conn: &mut SqliteConnection, owner_id: &str) -> DbResult<Option<CashShift>> {
    let shift = sqlx::query_as::<_, CashShift>(
        r#"
        SELECT id, owner_id, opened_at, opening_balance_cents,
               closed_at, closing_balance_cents, comment
        FROM cash_shifts
        WHERE owner_id = ?1 AND closed_at IS NULL
        "#,
    )
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(shift)
}

/// Reads the window's sales and expenses and hands them to the pure
/// reconciliation.
async fn compute_preview(
    conn: &mut SqliteConnection,
    shift: &CashShift,
    window_end: DateTime<Utc>,
) -> DbResult<ShiftPreview> {
    let sales: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT payment_method, total_cents
        FROM sales
        WHERE owner_id = ?1 AND sold_at >= ?2 AND sold_at <= ?3
        "#,
    )
    .bind(&shift.owner_id)
    .bind(shift.opened_at)
    .bind(window_end)
    .fetch_all(&mut *conn)
    .await?;

    // Dedicated payment method wins over the category.
    let expenses: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT COALESCE(NULLIF(TRIM(payment_method), ''), category, ''), amount_cents
        FROM expenses
        WHERE owner_id = ?1 AND created_at >= ?2 AND created_at <= ?3
        "#,
    )
    .bind(&shift.owner_id)
    .bind(shift.opened_at)
    .bind(window_end)
    .fetch_all(&mut *conn)
    .await?;

    debug!(
        shift_id = %shift.id,
        sales = sales.len(),
        expenses = expenses.len(),
        "Computing shift preview"
    );

    Ok(ShiftPreview::compute(
        shift,
        window_end,
        sales
            .iter()
            .map(|(method, cents)| (method.as_str(), Money::from_cents(*cents))),
        expenses
            .iter()
            .map(|(source, cents)| (source.as_str(), Money::from_cents(*cents))),
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{db, product, OTHER_OWNER, OWNER};
    use chrono::NaiveDate;
    use mostrador_core::{ErrorKind, NewExpense, Quantity, SaleLine, UnitOfMeasure};

    async fn sell(db: &crate::Database, product_id: &str, cents: i64, method: &str) {
        db.sales()
            .commit(
                OWNER,
                Money::from_cents(cents),
                method,
                &[SaleLine {
                    product_id: product_id.to_string(),
                    quantity: Quantity::from_units(1),
                    unit_price: Money::from_cents(cents),
                    unit: UnitOfMeasure::Unit,
                }],
            )
            .await
            .unwrap();
    }

    fn expense(cents: i64, category: Option<&str>, method: Option<&str>) -> NewExpense {
        NewExpense {
            expense_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            description: "Hielo".into(),
            amount: Money::from_cents(cents),
            category: category.map(str::to_string),
            payment_method: method.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_second_open_is_conflict() {
        let db = db().await;
        let first = db.shifts().open(OWNER, Money::from_cents(1000)).await.unwrap();

        let err = db.shifts().open(OWNER, Money::from_cents(5)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ShiftAlreadyOpen)));

        let still_open = db.shifts().get_open(OWNER).await.unwrap().unwrap();
        assert_eq!(still_open.id, first.id);
        assert_eq!(still_open.opening_balance_cents, 1000);

        // Other owners are independent
        db.shifts().open(OTHER_OWNER, Money::zero()).await.unwrap();
    }

    #[tokio::test]
    async fn test_preview_and_close() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 300, 10).await;
        let medialuna = product(&db, "Medialuna", 150, 10).await;

        // Before the shift: must not be counted
        sell(&db, &cafe.id, 300, "efectivo").await;

        db.shifts().open(OWNER, Money::from_cents(1000)).await.unwrap();
        sell(&db, &cafe.id, 300, "efectivo").await;
        sell(&db, &medialuna.id, 150, "tarjeta").await;
        db.expenses()
            .add(OWNER, expense(50, Some("efectivo"), None))
            .await
            .unwrap();

        let preview = db.shifts().preview(OWNER).await.unwrap();
        assert_eq!(preview.sales.cash.cents(), 300);
        assert_eq!(preview.sales.card.cents(), 150);
        assert_eq!(preview.expenses.cash.cents(), 50);
        assert_eq!(preview.expected_cash.cents(), 1250);
        assert_eq!(preview.net.cents(), 400);

        let report = db
            .shifts()
            .close(OWNER, Money::from_cents(1240), Some("faltan 10"))
            .await
            .unwrap();
        assert!(!report.shift.is_open());
        assert_eq!(report.shift.comment.as_deref(), Some("faltan 10"));
        assert_eq!(report.preview.expected_cash.cents(), 1250);
        assert_eq!(report.discrepancy.cents(), -10);

        assert!(db.shifts().get_open(OWNER).await.unwrap().is_none());
        // A new shift can be opened after closing
        db.shifts().open(OWNER, Money::from_cents(1240)).await.unwrap();
    }

    #[tokio::test]
    async fn test_expense_payment_method_overrides_category() {
        let db = db().await;
        db.shifts().open(OWNER, Money::from_cents(0)).await.unwrap();
        db.expenses()
            .add(OWNER, expense(80, Some("insumos"), Some("transferencia")))
            .await
            .unwrap();
        db.expenses()
            .add(OWNER, expense(20, Some("insumos"), None))
            .await
            .unwrap();

        let preview = db.shifts().preview(OWNER).await.unwrap();
        assert_eq!(preview.expenses.transfer.cents(), 80);
        assert_eq!(preview.expenses.other.cents(), 20);
        assert_eq!(preview.expenses.total.cents(), 100);
        assert_eq!(preview.expected_cash.cents(), 0);
    }

    #[tokio::test]
    async fn test_no_open_shift() {
        let db = db().await;

        let preview = db.shifts().preview(OWNER).await.unwrap_err();
        assert_eq!(preview.as_domain().unwrap().kind(), ErrorKind::NotFound);

        let close = db.shifts().close(OWNER, Money::zero(), None).await.unwrap_err();
        assert!(matches!(close, DbError::Domain(CoreError::NoOpenShift)));
    }

    #[tokio::test]
    async fn test_negative_opening_balance_rejected() {
        let db = db().await;
        let err = db.shifts().open(OWNER, Money::from_cents(-1)).await.unwrap_err();
        assert_eq!(err.as_domain().unwrap().kind(), ErrorKind::Validation);
        assert!(db.shifts().get_open(OWNER).await.unwrap().is_none());
    }
}
