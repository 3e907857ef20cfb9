//! # Database Handle
//!
//! [`Database`] owns one [`KvStore`] and hands out repositories over it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database<S: KvStore>                                                   │
//! │    ├── users()       → UserRepository       (users)                     │
//! │    ├── catalog()     → CatalogRepository    (books_state)               │
//! │    ├── ledgers()     → LedgerRepository     (user_<name>_borrowed)      │
//! │    ├── dashboards()  → DashboardRepository  (user_<name>_dashboard)     │
//! │    ├── sessions()    → SessionRepository    (cookie_session)            │
//! │    └── commit(batch) → all staged writes or none                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::DbResult;
use crate::pool::{DbConfig, SqliteKvStore};
use crate::repository::catalog::CatalogRepository;
use crate::repository::dashboard::DashboardRepository;
use crate::repository::ledger::LedgerRepository;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::store::{KvStore, MemoryKvStore, WriteBatch};

/// Main storage handle providing repository access.
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug)]
pub struct Database<S = SqliteKvStore> {
    store: Arc<S>,
}

impl<S> Clone for Database<S> {
    fn clone(&self) -> Self {
        Database {
            store: Arc::clone(&self.store),
        }
    }
}

impl Database<SqliteKvStore> {
    /// Opens the SQLite database described by `config`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let db = Database::open(DbConfig::new("./shelf.db")).await?;
    /// let books = db.catalog().load().await?;
    /// ```
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        Ok(Database::new(SqliteKvStore::connect(config).await?))
    }
}

impl Database<MemoryKvStore> {
    /// A fresh, empty in-memory database.
    pub fn in_memory() -> Self {
        Database::new(MemoryKvStore::new())
    }
}

impl<S: KvStore> Database<S> {
    pub fn new(store: S) -> Self {
        Database {
            store: Arc::new(store),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn users(&self) -> UserRepository<S> {
        UserRepository::new(Arc::clone(&self.store))
    }

    pub fn catalog(&self) -> CatalogRepository<S> {
        CatalogRepository::new(Arc::clone(&self.store))
    }

    pub fn ledgers(&self) -> LedgerRepository<S> {
        LedgerRepository::new(Arc::clone(&self.store))
    }

    pub fn dashboards(&self) -> DashboardRepository<S> {
        DashboardRepository::new(Arc::clone(&self.store))
    }

    pub fn sessions(&self) -> SessionRepository<S> {
        SessionRepository::new(Arc::clone(&self.store))
    }

    /// Writes every staged entry in one atomic step.
    pub async fn commit(&self, batch: WriteBatch) -> DbResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        debug!(keys = ?batch.keys().collect::<Vec<_>>(), "Committing write batch");
        self.store.commit(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{BorrowLedger, DashboardState, Loan};
    use chrono::Utc;

    async fn stage_return<S: KvStore>(db: &Database<S>) {
        let mut state = DashboardState::default();
        state.loans.push(Loan::open(2, Utc::now()));

        let mut batch = WriteBatch::new();
        db.dashboards().stage(&mut batch, "alice", &state).unwrap();
        db.ledgers().stage(&mut batch, "alice", &BorrowLedger::new()).unwrap();
        db.commit(batch).await.unwrap();
    }

    #[tokio::test]
    async fn test_batch_through_memory_store() {
        let db = Database::in_memory();
        db.ledgers().save("alice", &BorrowLedger::from(vec![2])).await.unwrap();

        stage_return(&db).await;

        assert!(db.ledgers().get("alice").await.unwrap().is_empty());
        assert_eq!(db.dashboards().get("alice").await.unwrap().loans.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_through_sqlite_store() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        db.ledgers().save("alice", &BorrowLedger::from(vec![2])).await.unwrap();

        stage_return(&db).await;

        assert!(db.ledgers().get("alice").await.unwrap().is_empty());
        assert_eq!(db.dashboards().get("alice").await.unwrap().loans.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let db = Database::in_memory();
        let other = db.clone();
        db.catalog().load().await.unwrap();
        assert!(other.catalog().is_seeded().await.unwrap());
    }
}
