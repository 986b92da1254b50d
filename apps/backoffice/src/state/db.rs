//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_products(db: &DbState, session: &Session) -> Result<Vec<ProductDto>, ApiError> {
//!     let products = db.inner().products().list(session.owner_id()).await?;
//!     Ok(products.into_iter().map(ProductDto::from).collect())
//! }
//! ```

use mostrador_db::Database;

/// Wrapper around `Database` shared by every command.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
