//! # shelf-db: Storage Layer for Shelf
//!
//! All Shelf state is JSON under string keys. This crate defines the keys,
//! the [`KvStore`] seam and two backends for it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelf Data Flow                                  │
//! │                                                                         │
//! │  CLI command (return_book)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     shelf-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │ (database.rs) │    │  users        │    │  (embedded)  │  │   │
//! │  │   │               │◄───│  catalog      │    │              │  │   │
//! │  │   │ Arc<KvStore>  │    │  ledgers      │    │ 001_kv_store │  │   │
//! │  │   │ WriteBatch    │    │  dashboards   │    │              │  │   │
//! │  │   └───────┬───────┘    │  sessions     │    └──────────────┘  │   │
//! │  │           │            └───────────────┘                       │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │   SqliteKvStore (pool.rs)   or   MemoryKvStore (store.rs)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `KvStore` trait, write batches, in-memory backend
//! - [`pool`] - SQLite backend and connection pool configuration
//! - [`database`] - Repository access over any store
//! - [`repository`] - One repository per key family
//! - [`keys`] - Storage key names
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelf_db::{Database, DbConfig};
//!
//! let db = Database::open(DbConfig::new("path/to/shelf.db")).await?;
//! let ledger = db.ledgers().get("alice").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod database;
pub mod error;
pub mod keys;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use database::Database;
pub use error::{DbError, DbResult};
pub use pool::{DbConfig, SqliteKvStore};
pub use store::{KvStore, MemoryKvStore, WriteBatch};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::dashboard::DashboardRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::session::SessionRepository;
pub use repository::user::UserRepository;
