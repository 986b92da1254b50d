//! # Product Repository
//!
//! Catalog Store: products with price, stock and unit of measure.
//!
//! ## Stock Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Who may change products.stock_hundredths?                             │
//! │                                                                         │
//! │  ✅ update()            explicit catalog edit                          │
//! │  ✅ sale::commit_lines  conditional decrement (stock >= q)             │
//! │  ✅ SaleRepository::reverse   restore on sale deletion                 │
//! │  ❌ order items         tabs never touch stock                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mostrador_core::validation::{
    validate_description, validate_price, validate_product_name, validate_stock,
};
use mostrador_core::{CoreError, NewProduct, Product, ProductPatch};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the owner's products, newest first.
    pub async fn list(&self, owner_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, owner_id, name, description, price_cents,
                   stock_hundredths, unit, created_at, updated_at
            FROM products
            WHERE owner_id = ?1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(owner_id = %owner_id, count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found or owned by someone else
    pub async fn get(&self, owner_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, owner_id, name, description, price_cents,
                   stock_hundredths, unit, created_at, updated_at
            FROM products
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Like [`get`](Self::get) but missing is an error.
    pub async fn require(&self, owner_id: &str, id: &str) -> DbResult<Product> {
        self.get(owner_id, id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }

    /// Creates a product after validating name, price and stock.
    pub async fn create(&self, owner_id: &str, input: NewProduct) -> DbResult<Product> {
        let name = validate_product_name(&input.name)?;
        let description = validate_description(input.description.as_deref())?;
        validate_price(input.price)?;
        validate_stock(input.stock, input.unit)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name,
            description,
            price_cents: input.price.cents(),
            stock_hundredths: input.stock.hundredths(),
            unit: input.unit,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, owner_id, name, description, price_cents,
                stock_hundredths, unit, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.owner_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_hundredths)
        .bind(product.unit)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %product.id, "Product created");
        Ok(product)
    }

    /// Applies a partial update.
    ///
    /// The merged product is validated as a whole, so changing `unit` to
    /// `unit` with a fractional stock is rejected. Historical line items
    /// keep their own unit snapshot.
    pub async fn update(&self, owner_id: &str, id: &str, patch: ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Write first: takes the lock and tells us whether the row exists.
        let touched = sqlx::query("UPDATE products SET updated_at = ?1 WHERE id = ?2 AND owner_id = ?3")
            .bind(now)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id.to_string()).into());
        }

        let mut product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, owner_id, name, description, price_cents,
                   stock_hundredths, unit, created_at, updated_at
            FROM products
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(name) = patch.name {
            product.name = validate_product_name(&name)?;
        }
        if let Some(description) = patch.description {
            product.description = validate_description(description.as_deref())?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
            product.price_cents = price.cents();
        }
        if let Some(stock) = patch.stock {
            product.stock_hundredths = stock.hundredths();
        }
        if let Some(unit) = patch.unit {
            product.unit = unit;
        }
        validate_stock(product.stock(), product.unit)?;

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?1,
                description = ?2,
                price_cents = ?3,
                stock_hundredths = ?4,
                unit = ?5
            WHERE id = ?6 AND owner_id = ?7
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_hundredths)
        .bind(product.unit)
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id = %id, "Product updated");
        Ok(product)
    }

    /// Hard-deletes a product.
    ///
    /// Blocked with `ProductInUse` while any order or sale line references
    /// it. The `ON DELETE RESTRICT` foreign keys back this up.
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            "UPDATE products SET updated_at = updated_at WHERE id = ?1 AND owner_id = ?2",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id.to_string()).into());
        }

        let references: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM order_items WHERE product_id = ?1)
                 + (SELECT COUNT(*) FROM sale_items WHERE product_id = ?1)
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if references > 0 {
            warn!(id = %id, references, "Product delete blocked: still referenced");
            return Err(CoreError::ProductInUse {
                product_id: id.to_string(),
            }
            .into());
        }

        sqlx::query("DELETE FROM products WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => CoreError::ProductInUse {
                    product_id: id.to_string(),
                }
                .into(),
                other => other,
            })?;

        tx.commit().await?;

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Number of products owned by `owner_id`.
    pub async fn count(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE owner_id = ?1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
