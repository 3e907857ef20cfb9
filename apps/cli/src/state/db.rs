//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! The default store is SQLite; tests swap in `MemoryKvStore` through the
//! type parameter without touching any command.

use shelf_db::{Database, KvStore, SqliteKvStore};

/// Wrapper around `Database` for command state.
#[derive(Debug)]
pub struct DbState<S = SqliteKvStore> {
    db: Database<S>,
}

impl<S: KvStore> DbState<S> {
    /// Creates a new DbState wrapping the database handle.
    pub fn new(db: Database<S>) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let ledger = db_state.inner().ledgers().get("alice").await?;
    /// ```
    pub fn inner(&self) -> &Database<S> {
        &self.db
    }
}
