//! # Sale Commands
//!
//! Counter sales: commit with a declared total, delete (reverses stock),
//! history.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use super::{id_arg, money_arg, quantity_arg};
use crate::error::ApiError;
use crate::state::{DbState, Session};
use mostrador_core::{Sale, SaleItem, SaleLine, SaleWithItems, UnitOfMeasure};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItemDto {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub quantity_hundredths: i64,
    pub quantity: f64,
    pub unit_price_cents: i64,
    pub unit: UnitOfMeasure,
    pub line_total_cents: i64,
}

impl From<SaleItem> for SaleItemDto {
    fn from(item: SaleItem) -> Self {
        SaleItemDto {
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

/// A sale. `items` is empty in history listings.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDto {
    pub id: String,
    pub total_cents: i64,
    pub payment_method: String,
    pub sold_at: String,
    pub items: Vec<SaleItemDto>,
}

impl SaleDto {
    fn new(sale: Sale, items: Vec<SaleItem>) -> Self {
        SaleDto {
            id: sale.id,
            total_cents: sale.total_cents,
            payment_method: sale.payment_method,
            sold_at: sale.sold_at.to_rfc3339(),
            items: items.into_iter().map(SaleItemDto::from).collect(),
        }
    }
}

impl From<SaleWithItems> for SaleDto {
    fn from(s: SaleWithItems) -> Self {
        SaleDto::new(s.sale, s.items)
    }
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto::new(sale, Vec::new())
    }
}

/// One counter line as the UI sends it.
///
/// `unit` may be omitted; it is then taken from the product. When given it
/// must match the product's unit.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLineInput {
    pub product_id: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub unit: Option<UnitOfMeasure>,
}

impl SaleLineInput {
    async fn into_line(self, db: &DbState, session: &Session) -> Result<SaleLine, ApiError> {
        let product_id = id_arg("productId", &self.product_id)?;
        let unit = match self.unit {
            Some(unit) => unit,
            None => {
                db.inner()
                    .products()
                    .require(session.owner_id(), product_id)
                    .await?
                    .unit
            }
        };

        Ok(SaleLine {
            product_id: product_id.to_string(),
            quantity: quantity_arg(self.quantity, "quantity")?,
            unit_price: money_arg(self.unit_price, "unitPrice")?,
            unit,
        })
    }
}

/// Commits a counter sale.
///
/// `total` must equal the sum of the lines to the cent, otherwise the call
/// fails with `INTEGRITY` and nothing is written.
pub async fn commit_sale(
    db: &DbState,
    session: &Session,
    total: f64,
    payment_method: &str,
    lines: Vec<SaleLineInput>,
) -> Result<SaleDto, ApiError> {
    debug!(total, payment_method = %payment_method, lines = lines.len(), "commit_sale command");

    let total = money_arg(total, "total")?;
    let mut resolved = Vec::with_capacity(lines.len());
    for line in lines {
        resolved.push(line.into_line(db, session).await?);
    }

    let sale = db
        .inner()
        .sales()
        .commit(session.owner_id(), total, payment_method, &resolved)
        .await?;

    info!(sale_id = %sale.sale.id, total = %total, "Counter sale committed");
    Ok(SaleDto::from(sale))
}

/// Deletes a sale and puts its stock back. Returns the deleted sale.
pub async fn delete_sale(db: &DbState, session: &Session, id: &str) -> Result<SaleDto, ApiError> {
    debug!(id = %id, "delete_sale command");
    let id = id_arg("id", id)?;
    let sale = db.inner().sales().reverse(session.owner_id(), id).await?;
    Ok(SaleDto::from(sale))
}

/// Sales history, newest first.
pub async fn list_sales(db: &DbState, session: &Session) -> Result<Vec<SaleDto>, ApiError> {
    debug!("list_sales command");
    let sales = db.inner().sales().list(session.owner_id()).await?;
    Ok(sales.into_iter().map(SaleDto::from).collect())
}

pub async fn get_sale(db: &DbState, session: &Session, id: &str) -> Result<SaleDto, ApiError> {
    debug!(id = %id, "get_sale command");
    let id = id_arg("id", id)?;
    let sale = db
        .inner()
        .sales()
        .get(session.owner_id(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;
    Ok(SaleDto::from(sale))
}
