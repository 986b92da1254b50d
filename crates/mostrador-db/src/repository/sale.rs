//! # Sale Repository
//!
//! The Sale Committer: the only place where sales are created or removed and
//! where stock moves as a consequence.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit(owner, total, payment_method, lines)                            │
//! │                                                                         │
//! │  0. checkout::prepare_commit()        (no transaction yet)              │
//! │     └── total ≠ Σ lines → TotalMismatch, nothing written                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │  1. for each line:                                                      │
//! │       UPDATE products SET stock = stock - q                             │
//! │       WHERE id = ? AND owner_id = ? AND unit = ? AND stock >= q         │
//! │       RETURNING name                                                    │
//! │       └── no row → ProductNotFound | unit mismatch (Validation)         │
//! │                    | InsufficientStock → ROLLBACK                       │
//! │  2. INSERT sales                                                        │
//! │  3. INSERT sale_items (name / unit / price snapshots)                   │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional decrement is both the check and the write, so two
//! concurrent commits cannot oversell: the second one sees the reduced
//! stock and fails.
//!
//! ## Reverse
//! ```text
//! BEGIN
//! 1. UPDATE products SET stock = stock + Σ(sale lines for product)
//! 2. DELETE FROM sales WHERE id = ? AND owner_id = ?   (items cascade)
//!    └── no row → SaleNotFound → ROLLBACK (step 1 touched nothing)
//! COMMIT
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::checkout::{prepare_commit, CommitPlan};
use mostrador_core::{
    CoreError, Money, Quantity, Sale, SaleItem, SaleLine, SaleWithItems, UnitOfMeasure,
    ValidationError,
};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a counter sale atomically.
    ///
    /// ## Errors
    /// * `Validation` - no lines, bad quantity/price, blank payment method
    /// * `TotalMismatch` - `total` is not the sum of the lines
    /// * `ProductNotFound` - a line references a missing or foreign product
    /// * `InsufficientStock` - a line exceeds current stock
    /// * `Validation` - a line's unit is not the product's unit
    ///
    /// On any error nothing is written.
    pub async fn commit(
        &self,
        owner_id: &str,
        total: Money,
        payment_method: &str,
        lines: &[SaleLine],
    ) -> DbResult<SaleWithItems> {
        debug!(
            owner_id = %owner_id,
            total = %total,
            lines = lines.len(),
            "Committing sale"
        );

        let plan = prepare_commit(total, payment_method, lines).map_err(|e| {
            warn!(error = %e, "Sale rejected before commit");
            e
        })?;

        let mut tx = self.pool.begin().await?;
        let sale = commit_lines(&mut tx, owner_id, &plan, lines, Utc::now()).await?;
        tx.commit().await?;

        info!(
            sale_id = %sale.sale.id,
            total = %sale.sale.total(),
            payment_method = %sale.sale.payment_method,
            "Sale committed"
        );
        Ok(sale)
    }

    /// Deletes a sale and gives its stock back.
    ///
    /// A second call for the same sale fails with `SaleNotFound` and does not
    /// credit stock again.
    pub async fn reverse(&self, owner_id: &str, sale_id: &str) -> DbResult<SaleWithItems> {
        debug!(sale_id = %sale_id, "Reversing sale");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE products SET
                stock_hundredths = stock_hundredths + (
                    SELECT COALESCE(SUM(si.quantity_hundredths), 0)
                    FROM sale_items si
                    JOIN sales s ON s.id = si.sale_id
                    WHERE si.sale_id = ?1 AND s.owner_id = ?2
                      AND si.product_id = products.id
                ),
                updated_at = ?3
            WHERE id IN (
                SELECT si.product_id
                FROM sale_items si
                JOIN sales s ON s.id = si.sale_id
                WHERE si.sale_id = ?1 AND s.owner_id = ?2
            )
            "#,
        )
        .bind(sale_id)
        .bind(owner_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let Some(sale) = fetch_sale(&mut tx, owner_id, sale_id).await? else {
            warn!(sale_id = %sale_id, "Sale not found for reversal");
            return Err(CoreError::SaleNotFound(sale_id.to_string()).into());
        };
        let items = fetch_items(&mut tx, sale_id).await?;

        let deleted = sqlx::query("DELETE FROM sales WHERE id = ?1 AND owner_id = ?2")
            .bind(sale_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(CoreError::SaleNotFound(sale_id.to_string()).into());
        }

        tx.commit().await?;

        info!(sale_id = %sale_id, lines = items.len(), "Sale reversed");
        Ok(SaleWithItems { sale, items })
    }

    /// Sales history, newest first.
    pub async fn list(&self, owner_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, owner_id, total_cents, payment_method, sold_at, created_at
            FROM sales
            WHERE owner_id = ?1
            ORDER BY sold_at DESC, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale with its lines.
    pub async fn get(&self, owner_id: &str, sale_id: &str) -> DbResult<Option<SaleWithItems>> {
        let mut conn = self.pool.acquire().await?;

        let Some(sale) = fetch_sale(&mut conn, owner_id, sale_id).await? else {
            return Ok(None);
        };
        let items = fetch_items(&mut conn, sale_id).await?;

        Ok(Some(SaleWithItems { sale, items }))
    }
}

// =============================================================================
// Shared Transaction Steps
// =============================================================================

/// Decrements stock, inserts the sale and its lines on `conn`.
///
/// A line only matches its product when it is sold in the product's unit, so
/// the stored unit snapshot is always the product's and the quantity has
/// already been checked against that unit's granularity.
///
/// The caller owns the transaction; order close runs this inside its own.
/// The first statement issued here is a write.
pub(crate) async fn commit_lines(
    conn: &mut SqliteConnection,
    owner_id: &str,
    plan: &CommitPlan,
    lines: &[SaleLine],
    sold_at: DateTime<Utc>,
) -> DbResult<SaleWithItems> {
    let mut names = Vec::with_capacity(lines.len());

    for line in lines {
        let requested = line.quantity.hundredths();

        let name: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE products SET
                stock_hundredths = stock_hundredths - ?1,
                updated_at = ?2
            WHERE id = ?3 AND owner_id = ?4 AND unit = ?5 AND stock_hundredths >= ?1
            RETURNING name
            "#,
        )
        .bind(requested)
        .bind(sold_at)
        .bind(&line.product_id)
        .bind(owner_id)
        .bind(line.unit)
        .fetch_optional(&mut *conn)
        .await?;

        match name {
            Some(name) => names.push(name),
            None => return Err(stock_failure(conn, owner_id, line).await),
        }
    }

    let sale = Sale {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        total_cents: plan.total.cents(),
        payment_method: plan.payment_method.clone(),
        sold_at,
        created_at: sold_at,
    };

    sqlx::query(
        r#"
        INSERT INTO sales (id, owner_id, total_cents, payment_method, sold_at, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.owner_id)
    .bind(sale.total_cents)
    .bind(&sale.payment_method)
    .bind(sale.sold_at)
    .bind(sale.created_at)
    .execute(&mut *conn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (line, name) in lines.iter().zip(names) {
        let item = SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            product_id: line.product_id.clone(),
            name_snapshot: name,
            quantity_hundredths: line.quantity.hundredths(),
            unit_price_cents: line.unit_price.cents(),
            unit: line.unit,
            line_total_cents: line.line_total().cents(),
            created_at: sold_at,
        };

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, name_snapshot, quantity_hundredths,
                unit_price_cents, unit, line_total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(&item.name_snapshot)
        .bind(item.quantity_hundredths)
        .bind(item.unit_price_cents)
        .bind(item.unit)
        .bind(item.line_total_cents)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;

        items.push(item);
    }

    Ok(SaleWithItems { sale, items })
}

/// Explains why a conditional decrement matched no row.
async fn stock_failure(
    conn: &mut SqliteConnection,
    owner_id: &str,
    line: &SaleLine,
) -> crate::error::DbError {
    let current: Result<Option<(String, i64, UnitOfMeasure)>, sqlx::Error> = sqlx::query_as(
        "SELECT name, stock_hundredths, unit FROM products WHERE id = ?1 AND owner_id = ?2",
    )
    .bind(&line.product_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await;

    match current {
        Ok(Some((name, _, unit))) if unit != line.unit => {
            warn!(
                product_id = %line.product_id,
                product_unit = %unit,
                line_unit = %line.unit,
                "Line unit does not match product"
            );
            CoreError::from(ValidationError::InvalidFormat {
                field: "unit".to_string(),
                reason: format!("{} is sold by {}", name, unit),
            })
            .into()
        }
        Ok(Some((name, stock, _))) => {
            warn!(
                product_id = %line.product_id,
                available = stock,
                requested = line.quantity.hundredths(),
                "Insufficient stock"
            );
            CoreError::InsufficientStock {
                product: name,
                available: Quantity::from_hundredths(stock),
                requested: line.quantity,
            }
            .into()
        }
        Ok(None) => {
            warn!(product_id = %line.product_id, "Product not found at commit");
            CoreError::ProductNotFound(line.product_id.clone()).into()
        }
        Err(e) => e.into(),
    }
}

pub(crate) async fn fetch_sale(
    conn: &mut SqliteConnection,
    owner_id: &str,
    sale_id: &str,
) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, owner_id, total_cents, payment_method, sold_at, created_at
        FROM sales
        WHERE id = ?1 AND owner_id = ?2
        "#,
    )
    .bind(sale_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(sale)
}

pub(crate) async fn fetch_items(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SaleItem>> {
    let items = sqlx::query_as::<_, SaleItem>(
        r#"
        SELECT id, sale_id, product_id, name_snapshot, quantity_hundredths,
               unit_price_cents, unit, line_total_cents, created_at
        FROM sale_items
        WHERE sale_id = ?1
        ORDER BY rowid
        "#,
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================
