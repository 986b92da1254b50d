//! # Product Commands
//!
//! Catalog CRUD. Prices arrive in major units, stock in units or kilos;
//! both come back as integers (cents, hundredths) plus a display value.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::{id_arg, money_arg, quantity_arg};
use crate::error::ApiError;
use crate::state::{DbState, Session};
use mostrador_core::{NewProduct, Product, ProductPatch, UnitOfMeasure};

/// Product DTO for the UI.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock_hundredths: i64,
    /// `stock_hundredths / 100`, for display.
    pub stock: f64,
    pub unit: UnitOfMeasure,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            stock: p.stock().as_f64(),
            id: p.id,
            name: p.name,
            description: p.description,
            price_cents: p.price_cents,
            stock_hundredths: p.stock_hundredths,
            unit: p.unit,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub unit: UnitOfMeasure,
}

/// Partial update. Absent fields are left alone; an empty `description`
/// clears it.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<f64>,
    pub unit: Option<UnitOfMeasure>,
}

pub async fn list_products(db: &DbState, session: &Session) -> Result<Vec<ProductDto>, ApiError> {
    debug!("list_products command");
    let products = db.inner().products().list(session.owner_id()).await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

pub async fn get_product(db: &DbState, session: &Session, id: &str) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "get_product command");
    let id = id_arg("id", id)?;
    let product = db
        .inner()
        .products()
        .get(session.owner_id(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(ProductDto::from(product))
}

pub async fn create_product(
    db: &DbState,
    session: &Session,
    request: CreateProductRequest,
) -> Result<ProductDto, ApiError> {
    debug!(name = %request.name, "create_product command");
    let input = NewProduct {
        name: request.name,
        description: request.description,
        price: money_arg(request.price, "price")?,
        stock: quantity_arg(request.stock, "stock")?,
        unit: request.unit,
    };
    let product = db.inner().products().create(session.owner_id(), input).await?;
    Ok(ProductDto::from(product))
}

pub async fn update_product(
    db: &DbState,
    session: &Session,
    id: &str,
    request: UpdateProductRequest,
) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "update_product command");
    let id = id_arg("id", id)?;
    let patch = ProductPatch {
        name: request.name,
        description: request.description.map(Some),
        price: request.price.map(|p| money_arg(p, "price")).transpose()?,
        stock: request.stock.map(|s| quantity_arg(s, "stock")).transpose()?,
        unit: request.unit,
    };
    if patch.is_empty() {
        return get_product(db, session, id).await;
    }
    let product = db.inner().products().update(session.owner_id(), id, patch).await?;
    Ok(ProductDto::from(product))
}

pub async fn delete_product(db: &DbState, session: &Session, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_product command");
    let id = id_arg("id", id)?;
    db.inner().products().delete(session.owner_id(), id).await?;
    Ok(())
}
