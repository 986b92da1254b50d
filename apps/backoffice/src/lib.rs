//! # Mostrador Back-Office Library
//!
//! Owner-scoped async commands over the Mostrador database, for whatever UI
//! shell embeds them.
//!
//! ## Module Organization
//! ```text
//! mostrador_backoffice/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── config.rs       ◄─── AppConfig from environment
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── session.rs  ◄─── Authenticated owner
//! ├── commands/
//! │   ├── product.rs  ◄─── Catalog
//! │   ├── order.rs    ◄─── Mesas
//! │   ├── sale.rs     ◄─── Counter sales and history
//! │   ├── expense.rs  ◄─── Expense ledger
//! │   ├── shift.rs    ◄─── Arqueo
//! │   ├── supplier.rs ◄─── Supplier directory
//! │   └── schedule.rs ◄─── Staff schedules
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()       RUST_LOG or "info,mostrador=debug,sqlx=warn"   │
//! │  2. AppConfig::load()    MOSTRADOR_* environment variables              │
//! │  3. connect(&config)     SQLite (WAL) + pending migrations → DbState    │
//! │  4. Session::new(owner)  supplied by the external auth collaborator     │
//! │  5. commands::*(&db, &session, ...)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::ApiError;
use mostrador_db::{Database, DbConfig};
use state::DbState;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mostrador_db=trace` - Trace the database crate only
/// - Default: INFO, DEBUG for mostrador crates
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Opens the database described by `config` and wraps it for commands.
pub async fn connect(config: &AppConfig) -> Result<DbState, ApiError> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!(path = ?parent, error = %e, "Could not create data directory");
                ApiError::internal("Could not create data directory")
            })?;
        }
    }

    let db_config = DbConfig::new(&config.database_path).max_connections(config.max_connections);
    let db = Database::new(db_config).await?;

    info!(path = ?config.database_path, store = %config.store_name, "Database connected");
    Ok(DbState::new(db))
}
