//! # Supplier Repository
//!
//! Supplier Directory: who the store buys from.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::validation::{
    validate_email, validate_note, validate_short_text, validate_supplier_name,
};
use mostrador_core::{CoreError, NewSupplier, Supplier};

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists the owner's suppliers sorted by name.
    pub async fn list(&self, owner_id: &str) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, owner_id, name, contact_name, phone, email, address, created_at
            FROM suppliers
            WHERE owner_id = ?1
            ORDER BY name COLLATE NOCASE, created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(owner_id = %owner_id, count = suppliers.len(), "Listed suppliers");
        Ok(suppliers)
    }

    pub async fn add(&self, owner_id: &str, input: NewSupplier) -> DbResult<Supplier> {
        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: validate_supplier_name(&input.name)?,
            contact_name: validate_short_text("contact_name", input.contact_name.as_deref())?,
            phone: validate_short_text("phone", input.phone.as_deref())?,
            email: validate_email(input.email.as_deref())?,
            address: validate_note("address", input.address.as_deref())?,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, owner_id, name, contact_name, phone, email, address, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.owner_id)
        .bind(&supplier.name)
        .bind(&supplier.contact_name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %supplier.id, name = %supplier.name, "Supplier added");
        Ok(supplier)
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(id = %id, "Supplier not found for delete");
            return Err(CoreError::not_found("Supplier", id).into());
        }

        info!(id = %id, "Supplier deleted");
        Ok(())
    }
}
