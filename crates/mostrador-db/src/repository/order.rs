//! # Order Repository
//!
//! Order Ledger: tabs ("mesas") and their line items.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create(label)                                                         │
//! │        │                                                                │
//! │        ▼        open()                close(payment_method)             │
//! │   ┌────────┐ ───────────► ┌──────┐ ───────────────────────► closed      │
//! │   │ closed │              │ open │   items → Sale Committer             │
//! │   └────────┘ ◄─────────── └──────┘   items deleted, total = 0           │
//! │        │                   │   ▲                                        │
//! │        │ delete()          └───┘ add_item / remove_item                 │
//! │        ▼                         (total recomputed from items)          │
//! │     removed                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating method starts its transaction with a guarded
//! `UPDATE orders ... WHERE state = 'open'` (or similar). A zero row count
//! is then classified into not-found vs. wrong-state.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::sale::commit_lines;
use mostrador_core::checkout::prepare_commit;
use mostrador_core::validation::{validate_line_quantity, validate_order_label, validate_payment_method};
use mostrador_core::{
    CoreError, Order, OrderItem, OrderState, OrderWithItems, Product, Quantity, SaleLine,
    SaleWithItems,
};

/// Outcome of closing a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedOrder {
    /// The order, back in `closed` with total 0.
    pub order: Order,
    /// The committed sale; `None` when the tab had no items.
    pub sale: Option<SaleWithItems>,
}

/// Repository for order (mesa) database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists the owner's orders, oldest first, each with its items.
    pub async fn list(&self, owner_id: &str) -> DbResult<Vec<OrderWithItems>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, owner_id, label, state, total_cents, created_at, updated_at
            FROM orders
            WHERE owner_id = ?1
            ORDER BY created_at ASC, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT i.id, i.order_id, i.product_id, i.name_snapshot, i.quantity_hundredths,
                   i.unit_price_cents, i.unit, i.line_total_cents, i.created_at
            FROM order_items i
            JOIN orders o ON o.id = i.order_id
            WHERE o.owner_id = ?1
            ORDER BY i.rowid
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let result = orders
            .into_iter()
            .map(|order| {
                let own = items
                    .iter()
                    .filter(|i| i.order_id == order.id)
                    .cloned()
                    .collect();
                OrderWithItems { order, items: own }
            })
            .collect();

        Ok(result)
    }

    /// Gets one order with its items.
    pub async fn get(&self, owner_id: &str, order_id: &str) -> DbResult<Option<OrderWithItems>> {
        let mut conn = self.pool.acquire().await?;
        fetch_with_items(&mut conn, owner_id, order_id).await
    }

    /// Creates a new tab in `closed` state with total 0.
    pub async fn create(&self, owner_id: &str, label: &str) -> DbResult<Order> {
        let label = validate_order_label(label)?;
        let now = Utc::now();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            label,
            state: OrderState::Closed,
            total_cents: 0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (id, owner_id, label, state, total_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&order.id)
        .bind(&order.owner_id)
        .bind(&order.label)
        .bind(order.state)
        .bind(order.total_cents)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        info!(order_id = %order.id, label = %order.label, "Order created");
        Ok(order)
    }

    /// `closed → open`. Opening an open tab is a conflict.
    pub async fn open(&self, owner_id: &str, order_id: &str) -> DbResult<Order> {
        debug!(order_id = %order_id, "Opening order");

        let mut tx = self.pool.begin().await?;

        let opened = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET state = 'open', updated_at = ?1
            WHERE id = ?2 AND owner_id = ?3 AND state = 'closed'
            RETURNING id, owner_id, label, state, total_cents, created_at, updated_at
            "#,
        )
        .bind(Utc::now())
        .bind(order_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order) = opened else {
            return Err(match fetch_order(&mut tx, owner_id, order_id).await? {
                Some(order) => order.ensure_openable().err(),
                None => None,
            }
            .unwrap_or_else(|| CoreError::OrderNotFound(order_id.to_string()))
            .into());
        };

        tx.commit().await?;

        info!(order_id = %order_id, "Order opened");
        Ok(order)
    }

    /// Adds a line to an open tab.
    ///
    /// Captures the product's current name, price and unit. The stock check
    /// here is advisory and does not reserve anything; the authoritative
    /// check runs when the tab is closed.
    pub async fn add_item(
        &self,
        owner_id: &str,
        order_id: &str,
        product_id: &str,
        quantity: Quantity,
    ) -> DbResult<OrderWithItems> {
        debug!(
            order_id = %order_id,
            product_id = %product_id,
            quantity = %quantity,
            "Adding order item"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        lock_open_order(&mut tx, owner_id, order_id).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, owner_id, name, description, price_cents,
                   stock_hundredths, unit, created_at, updated_at
            FROM products
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(product_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        validate_line_quantity(quantity, product.unit)?;
        if let Err(e) = product.ensure_stock(quantity) {
            warn!(product_id = %product_id, error = %e, "Order item rejected");
            return Err(e.into());
        }

        let item = OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product_id: product.id.clone(),
            name_snapshot: product.name.clone(),
            quantity_hundredths: quantity.hundredths(),
            unit_price_cents: product.price_cents,
            unit: product.unit,
            line_total_cents: product.price().times(quantity).cents(),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO order_items (
                id, order_id, product_id, name_snapshot, quantity_hundredths,
                unit_price_cents, unit, line_total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(&item.name_snapshot)
        .bind(item.quantity_hundredths)
        .bind(item.unit_price_cents)
        .bind(item.unit)
        .bind(item.line_total_cents)
        .bind(item.created_at)
        .execute(&mut *tx)
        .await?;

        recompute_total(&mut tx, order_id).await?;
        let order = fetch_with_items(&mut tx, owner_id, order_id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;

        tx.commit().await?;

        info!(
            order_id = %order_id,
            item_id = %item.id,
            total = %order.order.total(),
            "Order item added"
        );
        Ok(order)
    }

    /// Removes one line from an open tab. Stock is not touched and the tab
    /// stays open even when it becomes empty.
    pub async fn remove_item(&self, owner_id: &str, item_id: &str) -> DbResult<OrderWithItems> {
        debug!(item_id = %item_id, "Removing order item");

        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            r#"
            UPDATE orders SET updated_at = ?1
            WHERE owner_id = ?2 AND state = 'open'
              AND id = (SELECT order_id FROM order_items WHERE id = ?3)
            "#,
        )
        .bind(Utc::now())
        .bind(owner_id)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        let order_id: Option<String> = sqlx::query_scalar(
            r#"
            SELECT o.id FROM order_items i
            JOIN orders o ON o.id = i.order_id
            WHERE i.id = ?1 AND o.owner_id = ?2
            "#,
        )
        .bind(item_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order_id) = order_id else {
            return Err(CoreError::not_found("Order item", item_id).into());
        };

        if touched.rows_affected() == 0 {
            warn!(order_id = %order_id, "Item removal on a closed order");
            return Err(CoreError::OrderNotOpen { order_id }.into());
        }

        sqlx::query("DELETE FROM order_items WHERE id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        recompute_total(&mut tx, &order_id).await?;
        let order = fetch_with_items(&mut tx, owner_id, &order_id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id.clone()))?;

        tx.commit().await?;

        info!(order_id = %order_id, item_id = %item_id, "Order item removed");
        Ok(order)
    }

    /// Closes a tab: its items become a sale, the tab goes back to
    /// `closed` with total 0 and no items. All in one transaction.
    pub async fn close(
        &self,
        owner_id: &str,
        order_id: &str,
        payment_method: &str,
    ) -> DbResult<ClosedOrder> {
        debug!(order_id = %order_id, payment_method = %payment_method, "Closing order");

        let payment_method = validate_payment_method(payment_method)?;
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let order = lock_open_order(&mut tx, owner_id, order_id).await?;
        let items = fetch_items(&mut tx, order_id).await?;

        let sale = if items.is_empty() {
            None
        } else {
            let lines: Vec<SaleLine> = items.iter().map(OrderItem::to_sale_line).collect();
            let plan = prepare_commit(order.total(), &payment_method, &lines)?;
            let sale = commit_lines(&mut tx, owner_id, &plan, &lines, now).await?;

            sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
                .bind(order_id)
                .execute(&mut *tx)
                .await?;

            Some(sale)
        };

        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET state = 'closed', total_cents = 0, updated_at = ?1
            WHERE id = ?2 AND owner_id = ?3
            RETURNING id, owner_id, label, state, total_cents, created_at, updated_at
            "#,
        )
        .bind(now)
        .bind(order_id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        match &sale {
            Some(sale) => info!(
                order_id = %order_id,
                sale_id = %sale.sale.id,
                total = %sale.sale.total(),
                "Order closed into sale"
            ),
            None => info!(order_id = %order_id, "Empty order closed"),
        }

        Ok(ClosedOrder { order, sale })
    }

    /// Deletes a closed tab. Open tabs are "active" and cannot be deleted.
    pub async fn delete(&self, owner_id: &str, order_id: &str) -> DbResult<()> {
        debug!(order_id = %order_id, "Deleting order");

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM orders WHERE id = ?1 AND owner_id = ?2 AND state = 'closed'",
        )
        .bind(order_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            let err = match fetch_order(&mut tx, owner_id, order_id).await? {
                Some(order) => order
                    .ensure_deletable()
                    .err()
                    .unwrap_or_else(|| CoreError::OrderNotFound(order_id.to_string())),
                None => CoreError::OrderNotFound(order_id.to_string()),
            };
            warn!(order_id = %order_id, error = %err, "Order delete rejected");
            return Err(err.into());
        }

        tx.commit().await?;

        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Touches an open order (taking the write lock) and returns it.
///
/// Fails with `OrderNotFound` or `OrderNotOpen`.
async fn lock_open_order(
    conn: &mut SqliteConnection,
    owner_id: &str,
    order_id: &str,
) -> DbResult<Order> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders SET updated_at = ?1
        WHERE id = ?2 AND owner_id = ?3 AND state = 'open'
        RETURNING id, owner_id, label, state, total_cents, created_at, updated_at
        "#,
    )
    .bind(Utc::now())
    .bind(order_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(order) = order {
        return Ok(order);
    }

    let err = match fetch_order(conn, owner_id, order_id).await? {
        Some(order) => order
            .ensure_open()
            .err()
            .unwrap_or_else(|| CoreError::OrderNotFound(order_id.to_string())),
        None => CoreError::OrderNotFound(order_id.to_string()),
    };
    warn!(order_id = %order_id, error = %err, "Order is not available for changes");
    Err(err.into())
}

/// Sets the running total to the sum of the current line totals.
async fn recompute_total(conn: &mut SqliteConnection, order_id: &str) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE orders SET total_cents = (
            SELECT COALESCE(SUM(line_total_cents), 0)
            FROM order_items
            WHERE order_id = ?1
        )
        WHERE id = ?1
        "#,
    )
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn fetch_order(
    conn: &mut SqliteConnection,
    owner_id: &str,
    order_id: &str,
) -> DbResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, owner_id, label, state, total_cents, created_at, updated_at
        FROM orders
        WHERE id = ?1 AND owner_id = ?2
        "#,
    )
    .bind(order_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(order)
}

async fn fetch_items(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT id, order_id, product_id, name_snapshot, quantity_hundredths,
               unit_price_cents, unit, line_total_cents, created_at
        FROM order_items
        WHERE order_id = ?1
        ORDER BY rowid
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}

async fn fetch_with_items(
    conn: &mut SqliteConnection,
    owner_id: &str,
    order_id: &str,
) -> DbResult<Option<OrderWithItems>> {
    let Some(order) = fetch_order(conn, owner_id, order_id).await? else {
        return Ok(None);
    };
    let items = fetch_items(conn, order_id).await?;
    Ok(Some(OrderWithItems { order, items }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{db, product, weighed_product, OTHER_OWNER, OWNER};
    use mostrador_core::{ErrorKind, Money};

    fn kind(err: &DbError) -> ErrorKind {
        err.as_domain().expect("domain error").kind()
    }

    fn items_sum(order: &OrderWithItems) -> i64 {
        order.items.iter().map(|i| i.line_total_cents).sum()
    }

    #[tokio::test]
    async fn test_new_order_is_closed_and_empty() {
        let db = db().await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        assert_eq!(order.state, OrderState::Closed);
        assert_eq!(order.total_cents, 0);
    }

    #[tokio::test]
    async fn test_open_twice_is_conflict() {
        let db = db().await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();

        let opened = db.orders().open(OWNER, &order.id).await.unwrap();
        assert_eq!(opened.state, OrderState::Open);

        let err = db.orders().open(OWNER, &order.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::OrderAlreadyOpen { .. })));

        let missing = db.orders().open(OWNER, "missing").await.unwrap_err();
        assert_eq!(kind(&missing), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_add_to_closed_order_is_conflict() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 10).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();

        let err = db
            .orders()
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::OrderNotOpen { .. })));
    }

    #[tokio::test]
    async fn test_running_total_tracks_items() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 10).await;
        let queso = weighed_product(&db, "Queso", 1099, 500).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();

        let after_first = db
            .orders()
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(2))
            .await
            .unwrap();
        assert_eq!(after_first.order.total_cents, 2400);
        assert_eq!(after_first.order.total_cents, items_sum(&after_first));

        let after_second = db
            .orders()
            .add_item(OWNER, &order.id, &queso.id, Quantity::from_hundredths(37))
            .await
            .unwrap();
        assert_eq!(after_second.order.total_cents, 2400 + 407);
        assert_eq!(after_second.order.total_cents, items_sum(&after_second));

        // Tabs never touch stock
        let cafe_now = db.products().require(OWNER, &cafe.id).await.unwrap();
        assert_eq!(cafe_now.stock_hundredths, 1000);

        let first_item = after_second.items[0].id.clone();
        let after_remove = db.orders().remove_item(OWNER, &first_item).await.unwrap();
        assert_eq!(after_remove.order.total_cents, 407);
        assert_eq!(after_remove.order.total_cents, items_sum(&after_remove));
    }

    #[tokio::test]
    async fn test_removing_last_item_keeps_order_open() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 10).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();

        let with_item = db
            .orders()
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(1))
            .await
            .unwrap();
        let emptied = db
            .orders()
            .remove_item(OWNER, &with_item.items[0].id)
            .await
            .unwrap();

        assert!(emptied.items.is_empty());
        assert_eq!(emptied.order.state, OrderState::Open);
        assert_eq!(emptied.order.total_cents, 0);
    }

    #[tokio::test]
    async fn test_add_item_validations() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 3).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();
        let repo = db.orders();

        let fractional = repo
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_hundredths(150))
            .await
            .unwrap_err();
        assert_eq!(kind(&fractional), ErrorKind::Validation);

        let too_many = repo
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(4))
            .await
            .unwrap_err();
        assert!(matches!(too_many, DbError::Domain(CoreError::InsufficientStock { .. })));

        let missing = repo
            .add_item(OWNER, &order.id, "missing", Quantity::from_units(1))
            .await
            .unwrap_err();
        assert!(matches!(missing, DbError::Domain(CoreError::ProductNotFound(_))));

        let unchanged = repo.get(OWNER, &order.id).await.unwrap().unwrap();
        assert!(unchanged.items.is_empty());
    }

    #[tokio::test]
    async fn test_close_commits_sale_and_resets_order() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 10).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();
        db.orders()
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(2))
            .await
            .unwrap();

        let closed = db.orders().close(OWNER, &order.id, "Efectivo").await.unwrap();

        assert_eq!(closed.order.state, OrderState::Closed);
        assert_eq!(closed.order.total_cents, 0);
        let sale = closed.sale.expect("sale committed");
        assert_eq!(sale.sale.total(), Money::from_cents(2400));
        assert_eq!(sale.sale.payment_method, "Efectivo");
        assert_eq!(sale.items.len(), 1);

        let reread = db.orders().get(OWNER, &order.id).await.unwrap().unwrap();
        assert!(reread.items.is_empty());

        let cafe_now = db.products().require(OWNER, &cafe.id).await.unwrap();
        assert_eq!(cafe_now.stock_hundredths, 800);
    }

    #[tokio::test]
    async fn test_close_with_insufficient_stock_leaves_order_unchanged() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 2).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();
        db.orders()
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(2))
            .await
            .unwrap();

        // Stock drops behind the tab's back (counter sale)
        db.sales()
            .commit(
                OWNER,
                Money::from_cents(1200),
                "efectivo",
                &[SaleLine {
                    product_id: cafe.id.clone(),
                    quantity: Quantity::from_units(1),
                    unit_price: Money::from_cents(1200),
                    unit: cafe.unit,
                }],
            )
            .await
            .unwrap();

        let err = db.orders().close(OWNER, &order.id, "efectivo").await.unwrap_err();
        assert_eq!(kind(&err), ErrorKind::Conflict);

        let reread = db.orders().get(OWNER, &order.id).await.unwrap().unwrap();
        assert_eq!(reread.order.state, OrderState::Open);
        assert_eq!(reread.order.total_cents, 2400);
        assert_eq!(reread.items.len(), 1);
        assert_eq!(db.sales().list(OWNER).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_close_empty_order_creates_no_sale() {
        let db = db().await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();

        let closed = db.orders().close(OWNER, &order.id, "efectivo").await.unwrap();
        assert!(closed.sale.is_none());
        assert_eq!(closed.order.state, OrderState::Closed);
        assert!(db.sales().list(OWNER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_requires_payment_method_and_open_state() {
        let db = db().await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();

        let not_open = db.orders().close(OWNER, &order.id, "efectivo").await.unwrap_err();
        assert!(matches!(not_open, DbError::Domain(CoreError::OrderNotOpen { .. })));

        db.orders().open(OWNER, &order.id).await.unwrap();
        let blank = db.orders().close(OWNER, &order.id, " ").await.unwrap_err();
        assert_eq!(kind(&blank), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let db = db().await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();

        let active = db.orders().delete(OWNER, &order.id).await.unwrap_err();
        assert!(matches!(active, DbError::Domain(CoreError::OrderActive { .. })));

        db.orders().close(OWNER, &order.id, "efectivo").await.unwrap();
        let foreign = db.orders().delete(OTHER_OWNER, &order.id).await.unwrap_err();
        assert_eq!(kind(&foreign), ErrorKind::NotFound);

        db.orders().delete(OWNER, &order.id).await.unwrap();
        assert!(db.orders().get(OWNER, &order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_on_tab_cannot_be_deleted() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 10).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();
        db.orders()
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(1))
            .await
            .unwrap();

        let err = db.products().delete(OWNER, &cafe.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ProductInUse { .. })));
    }

    #[tokio::test]
    async fn test_list_oldest_first_with_items() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 10).await;
        let first = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        let second = db.orders().create(OWNER, "Mesa 2").await.unwrap();
        db.orders().open(OWNER, &second.id).await.unwrap();
        db.orders()
            .add_item(OWNER, &second.id, &cafe.id, Quantity::from_units(1))
            .await
            .unwrap();

        let listed = db.orders().list(OWNER).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].order.id, first.id);
        assert!(listed[0].items.is_empty());
        assert_eq!(listed[1].order.id, second.id);
        assert_eq!(listed[1].items.len(), 1);

        assert!(db.orders().list(OTHER_OWNER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_foreign_item_is_not_found() {
        let db = db().await;
        let cafe = product(&db, "Cafe", 1200, 10).await;
        let order = db.orders().create(OWNER, "Mesa 1").await.unwrap();
        db.orders().open(OWNER, &order.id).await.unwrap();
        let with_item = db
            .orders()
            .add_item(OWNER, &order.id, &cafe.id, Quantity::from_units(1))
            .await
            .unwrap();

        let err = db
            .orders()
            .remove_item(OTHER_OWNER, &with_item.items[0].id)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), ErrorKind::NotFound);
    }
}
