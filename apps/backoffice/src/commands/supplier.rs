//! # Supplier Commands

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::id_arg;
use crate::error::ApiError;
use crate::state::{DbState, Session};
use mostrador_core::{NewSupplier, Supplier};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupplierDto {
    pub id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
}

impl From<Supplier> for SupplierDto {
    fn from(s: Supplier) -> Self {
        SupplierDto {
            id: s.id,
            name: s.name,
            contact_name: s.contact_name,
            phone: s.phone,
            email: s.email,
            address: s.address,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddSupplierRequest {
    pub name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<AddSupplierRequest> for NewSupplier {
    fn from(r: AddSupplierRequest) -> Self {
        NewSupplier {
            name: r.name,
            contact_name: r.contact_name,
            phone: r.phone,
            email: r.email,
            address: r.address,
        }
    }
}

pub async fn list_suppliers(db: &DbState, session: &Session) -> Result<Vec<SupplierDto>, ApiError> {
    debug!("list_suppliers command");
    let suppliers = db.inner().suppliers().list(session.owner_id()).await?;
    Ok(suppliers.into_iter().map(SupplierDto::from).collect())
}

pub async fn add_supplier(
    db: &DbState,
    session: &Session,
    request: AddSupplierRequest,
) -> Result<SupplierDto, ApiError> {
    debug!(name = %request.name, "add_supplier command");
    let supplier = db
        .inner()
        .suppliers()
        .add(session.owner_id(), request.into())
        .await?;
    Ok(SupplierDto::from(supplier))
}

pub async fn delete_supplier(db: &DbState, session: &Session, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_supplier command");
    let id = id_arg("id", id)?;
    db.inner().suppliers().delete(session.owner_id(), id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{other_session, setup};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_supplier_directory() {
        let (db, session) = setup().await;

        let added = add_supplier(
            &db,
            &session,
            AddSupplierRequest {
                name: "Lacteos del Sur".into(),
                email: Some("ventas@lacteos.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(added.email.as_deref(), Some("ventas@lacteos.com"));

        let err = add_supplier(&db, &session, AddSupplierRequest::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(list_suppliers(&db, &session).await.unwrap().len(), 1);
        assert!(list_suppliers(&db, &other_session()).await.unwrap().is_empty());

        delete_supplier(&db, &session, &added.id).await.unwrap();
        assert!(list_suppliers(&db, &session).await.unwrap().is_empty());
    }
}
