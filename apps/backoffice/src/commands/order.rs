//! # Order Commands
//!
//! Mesas: long-lived tabs that collect items and turn into a sale on close.
//!
//! ```text
//! create_order("Mesa 4") ─► closed ─open_order─► open ─add/remove items─┐
//!                             ▲                                         │
//!                             └──────── close_order("efectivo") ◄───────┘
//!                                       (sale committed, items cleared)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use super::sale::SaleDto;
use super::{id_arg, quantity_arg};
use crate::error::ApiError;
use crate::state::{DbState, Session};
use mostrador_core::{Order, OrderItem, OrderState, OrderWithItems, UnitOfMeasure};
use mostrador_db::ClosedOrder;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItemDto {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub quantity_hundredths: i64,
    pub quantity: f64,
    pub unit_price_cents: i64,
    pub unit: UnitOfMeasure,
    pub line_total_cents: i64,
}

impl From<OrderItem> for OrderItemDto {
    fn from(item: OrderItem) -> Self {
        OrderItemDto {
            quantity: item.quantity().as_f64(),
            id: item.id,
            product_id: item.product_id,
            name: item.name_snapshot,
            quantity_hundredths: item.quantity_hundredths,
            unit_price_cents: item.unit_price_cents,
            unit: item.unit,
            line_total_cents: item.line_total_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderDto {
    pub id: String,
    pub label: String,
    pub state: OrderState,
    pub total_cents: i64,
    pub items: Vec<OrderItemDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderDto {
    fn new(order: Order, items: Vec<OrderItem>) -> Self {
        OrderDto {
            id: order.id,
            label: order.label,
            state: order.state,
            total_cents: order.total_cents,
            items: items.into_iter().map(OrderItemDto::from).collect(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

impl From<OrderWithItems> for OrderDto {
    fn from(o: OrderWithItems) -> Self {
        OrderDto::new(o.order, o.items)
    }
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        OrderDto::new(order, Vec::new())
    }
}

/// Result of `close_order`: the emptied tab and the sale it produced, if any.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CloseOrderResponse {
    pub order: OrderDto,
    pub sale: Option<SaleDto>,
}

impl From<ClosedOrder> for CloseOrderResponse {
    fn from(closed: ClosedOrder) -> Self {
        CloseOrderResponse {
            order: OrderDto::from(closed.order),
            sale: closed.sale.map(SaleDto::from),
        }
    }
}

/// Lists mesas, oldest first, with their items.
pub async fn list_orders(db: &DbState, session: &Session) -> Result<Vec<OrderDto>, ApiError> {
    debug!("list_orders command");
    let orders = db.inner().orders().list(session.owner_id()).await?;
    Ok(orders.into_iter().map(OrderDto::from).collect())
}

pub async fn get_order(db: &DbState, session: &Session, id: &str) -> Result<OrderDto, ApiError> {
    debug!(id = %id, "get_order command");
    let id = id_arg("id", id)?;
    let order = db
        .inner()
        .orders()
        .get(session.owner_id(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", id))?;
    Ok(OrderDto::from(order))
}

pub async fn create_order(db: &DbState, session: &Session, label: &str) -> Result<OrderDto, ApiError> {
    debug!(label = %label, "create_order command");
    let order = db.inner().orders().create(session.owner_id(), label).await?;
    Ok(OrderDto::from(order))
}

pub async fn open_order(db: &DbState, session: &Session, id: &str) -> Result<OrderDto, ApiError> {
    debug!(id = %id, "open_order command");
    let id = id_arg("id", id)?;
    let order = db.inner().orders().open(session.owner_id(), id).await?;
    Ok(OrderDto::from(order))
}

/// Closes the mesa, committing its items as one sale paid with
/// `payment_method`.
pub async fn close_order(
    db: &DbState,
    session: &Session,
    id: &str,
    payment_method: &str,
) -> Result<CloseOrderResponse, ApiError> {
    debug!(id = %id, payment_method = %payment_method, "close_order command");
    let id = id_arg("id", id)?;
    let closed = db
        .inner()
        .orders()
        .close(session.owner_id(), id, payment_method)
        .await?;
    if let Some(sale) = &closed.sale {
        info!(order_id = %id, sale_id = %sale.sale.id, "Mesa closed into sale");
    }
    Ok(CloseOrderResponse::from(closed))
}

pub async fn add_order_item(
    db: &DbState,
    session: &Session,
    order_id: &str,
    product_id: &str,
    quantity: f64,
) -> Result<OrderDto, ApiError> {
    debug!(order_id = %order_id, product_id = %product_id, quantity, "add_order_item command");
    let order_id = id_arg("orderId", order_id)?;
    let product_id = id_arg("productId", product_id)?;
    let quantity = quantity_arg(quantity, "quantity")?;
    let order = db
        .inner()
        .orders()
        .add_item(session.owner_id(), order_id, product_id, quantity)
        .await?;
    Ok(OrderDto::from(order))
}

pub async fn remove_order_item(
    db: &DbState,
    session: &Session,
    item_id: &str,
) -> Result<OrderDto, ApiError> {
    debug!(item_id = %item_id, "remove_order_item command");
    let item_id = id_arg("itemId", item_id)?;
    let order = db.inner().orders().remove_item(session.owner_id(), item_id).await?;
    Ok(OrderDto::from(order))
}

pub async fn delete_order(db: &DbState, session: &Session, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_order command");
    let id = id_arg("id", id)?;
    db.inner().orders().delete(session.owner_id(), id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::product::{create_product, get_product, CreateProductRequest};
    use crate::commands::test_support::setup;
    use crate::error::ErrorCode;

    async fn product(db: &DbState, session: &Session, name: &str, price: f64, stock: f64) -> String {
        create_product(
            db,
            session,
            CreateProductRequest {
                name: name.into(),
                description: None,
                price,
                stock,
                unit: UnitOfMeasure::Unit,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_mesa_lifecycle() {
        let (db, session) = setup().await;
        let cafe = product(&db, &session, "Cafe", 10.0, 5.0).await;

        let mesa = create_order(&db, &session, "Mesa 4").await.unwrap();
        assert_eq!(mesa.state, OrderState::Closed);

        let err = add_order_item(&db, &session, &mesa.id, &cafe, 1.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        open_order(&db, &session, &mesa.id).await.unwrap();
        let mesa = add_order_item(&db, &session, &mesa.id, &cafe, 2.0).await.unwrap();
        assert_eq!(mesa.total_cents, 2000);
        assert_eq!(mesa.items[0].quantity, 2.0);

        let err = delete_order(&db, &session, &mesa.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let closed = close_order(&db, &session, &mesa.id, "tarjeta").await.unwrap();
        assert_eq!(closed.order.state, OrderState::Closed);
        assert_eq!(closed.order.total_cents, 0);
        let sale = closed.sale.unwrap();
        assert_eq!(sale.total_cents, 2000);
        assert_eq!(sale.payment_method, "tarjeta");

        let stock = get_product(&db, &session, &cafe).await.unwrap();
        assert_eq!(stock.stock_hundredths, 300);

        let mesa = get_order(&db, &session, &mesa.id).await.unwrap();
        assert!(mesa.items.is_empty());
        delete_order(&db, &session, &mesa.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_last_item_keeps_mesa_open() {
        let (db, session) = setup().await;
        let cafe = product(&db, &session, "Cafe", 3.0, 5.0).await;
        let mesa = create_order(&db, &session, "Barra").await.unwrap();
        open_order(&db, &session, &mesa.id).await.unwrap();

        let with_item = add_order_item(&db, &session, &mesa.id, &cafe, 1.0).await.unwrap();
        let item_id = with_item.items[0].id.clone();

        let after = remove_order_item(&db, &session, &item_id).await.unwrap();
        assert_eq!(after.state, OrderState::Open);
        assert_eq!(after.total_cents, 0);
        assert!(after.items.is_empty());
    }

    #[tokio::test]
    async fn test_close_empty_mesa_has_no_sale() {
        let (db, session) = setup().await;
        let mesa = create_order(&db, &session, "Mesa 1").await.unwrap();
        open_order(&db, &session, &mesa.id).await.unwrap();

        let closed = close_order(&db, &session, &mesa.id, "efectivo").await.unwrap();
        assert!(closed.sale.is_none());
        assert_eq!(closed.order.state, OrderState::Closed);
    }
}
