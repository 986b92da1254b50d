//! # mostrador-db: Database Layer for Mostrador
//!
//! SQLite persistence through sqlx: pool, migrations, repositories and the
//! transactional boundaries of the system (sale commit, sale reversal,
//! order close, shift open/close).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mostrador Data Flow                              │
//! │                                                                         │
//! │  backoffice command (close_order)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   mostrador-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo     │    │ 001_initial  │  │   │
//! │  │   │ WAL + busy    │    │ SaleRepo ★    │    │ _schema.sql  │  │   │
//! │  │   │ timeout       │    │ ShiftRepo ★   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ★ = owns multi-row transactions                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir, see backoffice config)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per aggregate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mostrador_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("mostrador.db")).await?;
//! let products = db.products().list(owner_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::expense::ExpenseRepository;
pub use repository::order::{ClosedOrder, OrderRepository};
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::schedule::ScheduleRepository;
pub use repository::shift::ShiftRepository;
pub use repository::supplier::SupplierRepository;
