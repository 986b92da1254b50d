//! # State Module
//!
//! What every command receives besides its own arguments.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐          ┌──────────────────────────────┐        │
//! │  │    DbState       │          │    Session                   │        │
//! │  │  • SQLite pool   │          │  • owner_id (from auth)      │        │
//! │  │  • Repositories  │          │  • scopes every query        │        │
//! │  └──────────────────┘          └──────────────────────────────┘        │
//! │                                                                         │
//! │  DbState is shared by all sessions; the pool is thread-safe.           │
//! │  Session is per caller and immutable.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod db;
mod session;

pub use db::DbState;
pub use session::Session;
